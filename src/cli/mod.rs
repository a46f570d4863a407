//! # CLI Module
//!
//! The presentation layer of vibemix. Each command drives the pipeline in the
//! same order:
//!
//! ```text
//! search artist → aggregate discography → filter → (create playlist)
//! ```
//!
//! ## Commands
//!
//! - [`auth`] / [`logout`] - Obtain or discard the Spotify user token
//! - [`search`] - Search artists and show them as a table
//! - [`tracks`] - Preview the filtered discography of an artist
//! - [`playlist`] - Create a playlist from the filtered discography
//! - [`studio`] - Interactive session that keeps the discography cached while
//!   the filters are adjusted
//!
//! ## Error Handling
//!
//! Missing credentials or tokens terminate the program with a hint. Pipeline
//! errors are printed with their context; authentication failures discard the
//! stored token so the next run starts a fresh login.

use std::sync::Arc;

use tabled::Table;

use crate::{
    error::Error,
    management::TokenManager,
    spotify::{Catalog, SpotifyClient, auth::SpotifyAuth},
    types::{ArtistRef, TrackRecord, TrackTableRow},
    warning,
};

mod auth;
mod playlist;
mod search;
mod studio;
mod tracks;

pub use auth::auth;
pub use auth::logout;
pub use playlist::playlist;
pub use search::search;
pub use studio::studio;
pub use tracks::tracks;

fn identity() -> Arc<SpotifyAuth> {
    match SpotifyAuth::from_env() {
        Ok(identity) => Arc::new(identity),
        Err(e) => crate::error!(
            "{}\nAdd it to {}",
            e,
            crate::config::data_dir().join(".env").display()
        ),
    }
}

/// Builds an authenticated client from the stored token or exits.
async fn connect() -> SpotifyClient {
    match TokenManager::load(identity()).await {
        Ok(tokens) => SpotifyClient::new(tokens),
        Err(e) => crate::error!("Failed to load token. Please run vibemix auth\n Error: {}", e),
    }
}

/// First search hit for `query`.
async fn resolve_artist<C>(catalog: &C, query: &str) -> Result<Option<ArtistRef>, Error>
where
    C: Catalog + ?Sized,
{
    let mut results = catalog.search_artists(query, 1).await?;
    Ok(if results.is_empty() {
        None
    } else {
        Some(results.remove(0))
    })
}

/// Prints a surfaced pipeline error. Authentication failures also discard the
/// stored token.
async fn report_failure(e: &Error) {
    warning!("{}", e);

    if e.requires_reauth() {
        if let Ok(tokens) = TokenManager::load(identity()).await {
            if let Err(e) = tokens.forget().await {
                warning!("Failed to remove the stored token: {}", e);
            }
        }
        warning!("Your Spotify session is no longer valid. Please run vibemix auth");
    }
}

fn print_tracks(tracks: &[TrackRecord], limit: Option<usize>) {
    let shown = limit.unwrap_or(tracks.len()).min(tracks.len());
    let rows: Vec<TrackTableRow> = tracks[..shown].iter().map(TrackTableRow::from).collect();
    println!("{}", Table::new(rows));
    if shown < tracks.len() {
        println!("... and {} more", tracks.len() - shown);
    }
}
