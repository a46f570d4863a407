//! Playlist materialization.

use crate::{
    error::{Error, Result},
    progress::ProgressSink,
    spotify::{Catalog, MAX_PLAYLIST_ITEMS_PER_REQUEST},
    types::{ArtistRef, FilterSpec, PlaylistDraft, PlaylistHandle, TrackRecord},
};

pub const PLAYLIST_CHUNK_SIZE: usize = MAX_PLAYLIST_ITEMS_PER_REQUEST;

impl PlaylistDraft {
    /// Draft for the filtered tracks of `artist`, named "<artist> - Custom Mix".
    pub fn for_artist(
        artist: &ArtistRef,
        user_id: &str,
        spec: &FilterSpec,
        tracks: &[TrackRecord],
    ) -> Self {
        PlaylistDraft {
            name: format!("{} - Custom Mix", artist.name),
            description: format!(
                "Generated by {}. Filters: {}",
                env!("CARGO_PKG_NAME"),
                spec.describe()
            ),
            user_id: user_id.to_string(),
            uris: tracks.iter().map(|t| t.uri.clone()).collect(),
            public: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }
}

/// Creates the playlist and appends the draft's URIs in order, at most
/// [`PLAYLIST_CHUNK_SIZE`] per request.
///
/// # Errors
///
/// - [`Error::EmptyPlaylist`] when the draft has no URIs; nothing is created.
/// - [`Error::PlaylistCreate`] when creation fails; nothing is added.
/// - [`Error::PlaylistAppend`] when a chunk fails. The playlist keeps the
///   chunks written before the failure and is not deleted.
pub async fn materialize<C, P>(
    catalog: &C,
    draft: PlaylistDraft,
    progress: &mut P,
) -> Result<PlaylistHandle>
where
    C: Catalog + ?Sized,
    P: ProgressSink + ?Sized,
{
    if draft.uris.is_empty() {
        return Err(Error::EmptyPlaylist(draft.name));
    }

    progress.report(&format!("Creating playlist '{}'...", draft.name));
    let playlist = catalog
        .create_playlist(&draft.user_id, &draft.name, &draft.description, draft.public)
        .await
        .map_err(|e| Error::PlaylistCreate {
            name: draft.name.clone(),
            source: Box::new(e),
        })?;

    let chunks = draft.uris.chunks(PLAYLIST_CHUNK_SIZE);
    let total_chunks = chunks.len();
    let mut tracks_added = 0;

    for (i, chunk) in chunks.enumerate() {
        progress.report(&format!(
            "Adding tracks {}-{} of {}...",
            tracks_added + 1,
            tracks_added + chunk.len(),
            draft.uris.len()
        ));

        if let Err(e) = catalog.add_tracks_to_playlist(&playlist.id, chunk).await {
            return Err(Error::PlaylistAppend {
                playlist,
                chunks_added: i,
                tracks_added,
                source: Box::new(e),
            });
        }

        tracks_added += chunk.len();
        log::debug!("chunk {}/{} added to {}", i + 1, total_chunks, playlist.id);
    }

    progress.report(&format!(
        "Playlist '{}' created with {} tracks.",
        playlist.name, tracks_added
    ));
    Ok(playlist)
}
