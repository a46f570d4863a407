//! # Spotify Integration Module
//!
//! This module is the integration layer between the playlist pipeline and the
//! Spotify Web API. The pipeline only ever talks to the [`Catalog`] trait, so
//! it can run against [`SpotifyClient`] in production and against scripted
//! catalogs in tests.
//!
//! ## Architecture
//!
//! ```text
//! Pipeline (discography, filter, playlist)
//!          ↓
//! Catalog trait
//!     ├── SpotifyClient (reqwest, bearer token, retry on 502/429)
//!     └── Authentication (authorization code + PKCE, token refresh)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Request limits
//!
//! The Web API caps several endpoints. Callers must respect these constants:
//!
//! - `GET /artists/{id}/albums` - at most [`MAX_PAGE_SIZE`] releases per page
//! - `GET /albums/{id}/tracks` - at most [`MAX_PAGE_SIZE`] tracks per page
//! - `GET /tracks` - at most [`MAX_TRACKS_PER_REQUEST`] ids
//! - `GET /audio-features` - at most [`MAX_AUDIO_FEATURES_PER_REQUEST`] ids
//! - `POST /playlists/{id}/tracks` - at most [`MAX_PLAYLIST_ITEMS_PER_REQUEST`] uris
//!
//! ## Pagination
//!
//! Listing endpoints return a [`Page`] with an optional `next` cursor. The
//! [`paginate`] helper follows the cursor until it is absent; every call starts
//! over from the first page.

use std::future::Future;

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{
        ArtistRef, AudioFeaturesObject, FullTrack, Page, PlaylistHandle, Release, ReleaseTrack,
        UserProfile,
    },
    utils::ReleaseKinds,
};

pub mod auth;
mod client;

pub use client::SpotifyClient;

pub const MAX_PAGE_SIZE: u32 = 50;
pub const MAX_TRACKS_PER_REQUEST: usize = 50;
pub const MAX_AUDIO_FEATURES_PER_REQUEST: usize = 100;
pub const MAX_PLAYLIST_ITEMS_PER_REQUEST: usize = 100;

/// The catalog operations the pipeline consumes.
///
/// `cursor` is `None` for the first page and the `next` value of the previous
/// page afterwards.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn current_user(&self) -> Result<UserProfile>;

    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistRef>>;

    async fn list_artist_releases(
        &self,
        artist_id: &str,
        kinds: &ReleaseKinds,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<Page<Release>>;

    async fn list_release_tracks(
        &self,
        release_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<ReleaseTrack>>;

    /// Full track objects in input order; `None` where the id is unknown.
    async fn get_tracks(&self, ids: &[String]) -> Result<Vec<Option<FullTrack>>>;

    /// Audio features in input order; `None` where analysis is unavailable.
    async fn get_audio_features(&self, ids: &[String]) -> Result<Vec<Option<AudioFeaturesObject>>>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<PlaylistHandle>;

    async fn add_tracks_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<()>;
}

/// Follows `next` cursors until exhausted and returns every item in page order.
pub async fn paginate<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch(cursor.take()).await?;
        items.extend(page.items);

        match page.next {
            Some(next) => {
                log::debug!("following page cursor {}", next);
                cursor = Some(next);
            }
            None => break,
        }
    }

    Ok(items)
}
