//! Error taxonomy for the playlist pipeline.
//!
//! Listing, authentication and playlist failures surface to the caller.
//! Enrichment failures are represented by [`EnrichmentError`] and never leave
//! the aggregator; affected tracks fall back to documented defaults.

use thiserror::Error;

use crate::types::PlaylistHandle;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Credential, code exchange or refresh failure. Callers must discard the
    /// session token and authenticate again.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Missing configuration: {0}")]
    Config(String),

    /// Release or track pagination failed. No partial track list is returned.
    #[error("Failed to list {what}: {source}")]
    Listing {
        what: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to create playlist '{name}': {source}")]
    PlaylistCreate {
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// The playlist exists but only the first `chunks_added` chunks were
    /// written. Nothing is rolled back.
    #[error(
        "Playlist '{}' was created but adding tracks failed after {chunks_added} chunk(s) / {tracks_added} track(s): {source}",
        .playlist.name
    )]
    PlaylistAppend {
        playlist: PlaylistHandle,
        chunks_added: usize,
        tracks_added: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("No tracks to add to playlist '{0}'")]
    EmptyPlaylist(String),

    #[error("Spotify API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn listing(what: impl Into<String>, source: Error) -> Self {
        Error::Listing {
            what: what.into(),
            source: Box::new(source),
        }
    }

    /// Whether the error means the stored token can no longer be used.
    pub fn requires_reauth(&self) -> bool {
        match self {
            Error::Auth(_) => true,
            Error::Api { status, .. } => *status == 401,
            Error::Listing { source, .. }
            | Error::PlaylistCreate { source, .. }
            | Error::PlaylistAppend { source, .. } => source.requires_reauth(),
            _ => false,
        }
    }
}

/// A failed popularity or audio-feature batch.
#[derive(Error, Debug)]
#[error("{stage} batch {batch} ({size} ids) failed: {source}")]
pub struct EnrichmentError {
    pub stage: &'static str,
    pub batch: usize,
    pub size: usize,
    #[source]
    pub source: Error,
}
