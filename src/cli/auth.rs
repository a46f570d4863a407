use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, management::TokenManager, spotify, success, types::PkceToken};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    let identity = super::identity();

    match spotify::auth::auth(Arc::clone(&identity), shared_state).await {
        Ok(token) => {
            let token_manager = TokenManager::new(token, identity);
            if let Err(e) = token_manager.persist().await {
                error!("Failed to save token: {}", e);
            }
            success!("Authentication successful!");
        }
        Err(e) => error!("{}", e),
    }
}

pub async fn logout() {
    match TokenManager::load(super::identity()).await {
        Ok(tokens) => match tokens.forget().await {
            Ok(()) => success!("Logged out."),
            Err(e) => error!("Failed to remove token: {}", e),
        },
        Err(_) => success!("Not logged in."),
    }
}
