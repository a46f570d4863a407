use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    api, config,
    error::{Error, Result},
    spotify::auth::SpotifyAuth,
    types::PkceToken,
};

/// Routes of the callback server. The callback is mounted on the path of the
/// configured redirect URI.
pub fn router(state: Arc<Mutex<Option<PkceToken>>>, identity: Arc<SpotifyAuth>) -> Router {
    let callback_path = config::callback_path(&identity.credentials().redirect_uri);

    Router::new()
        .route("/health", get(api::health))
        .route(&callback_path, get(api::callback))
        .layer(Extension(state))
        .layer(Extension(identity))
}

/// Serves [`router`] on `listener` until the task is dropped.
pub async fn serve(
    listener: TcpListener,
    state: Arc<Mutex<Option<PkceToken>>>,
    identity: Arc<SpotifyAuth>,
) -> Result<()> {
    axum::serve(listener, router(state, identity)).await?;
    Ok(())
}

pub async fn start_api_server(
    state: Arc<Mutex<Option<PkceToken>>>,
    identity: Arc<SpotifyAuth>,
) -> Result<()> {
    let addr = SocketAddr::from_str(&config::server_addr(&identity.credentials().redirect_uri))
        .map_err(|e| Error::Config(format!("failed to parse server address: {}", e)))?;

    log::debug!("callback server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    serve(listener, state, identity).await
}
