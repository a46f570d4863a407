use crate::{
    discography,
    error::Result,
    filter,
    progress::ProgressSink,
    spotify::Catalog,
    types::{ArtistRef, FilterSpec, TrackRecord},
};

struct TrackCache {
    artist_id: String,
    tracks: Vec<TrackRecord>,
}

/// In-memory state of one browsing session.
///
/// The aggregated tracks are cached under the id of the artist they belong
/// to. A cache for a different artist is never served and is replaced as a
/// whole once the new artist's discography has been aggregated.
pub struct Session {
    artist: Option<ArtistRef>,
    cache: Option<TrackCache>,
    pub filter: FilterSpec,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            artist: None,
            cache: None,
            filter: FilterSpec::default(),
        }
    }

    pub fn select_artist(&mut self, artist: ArtistRef) -> &mut Self {
        self.artist = Some(artist);
        self
    }

    /// Drops the current selection, e.g. when going back to search.
    pub fn clear_artist(&mut self) -> &mut Self {
        self.artist = None;
        self
    }

    pub fn artist(&self) -> Option<&ArtistRef> {
        self.artist.as_ref()
    }

    /// Cached tracks, only when they belong to the selected artist.
    pub fn cached_tracks(&self) -> Option<&[TrackRecord]> {
        let artist = self.artist.as_ref()?;
        self.cache
            .as_ref()
            .filter(|c| c.artist_id == artist.id)
            .map(|c| c.tracks.as_slice())
    }

    /// Tracks of the selected artist, aggregating them on a cache miss.
    ///
    /// Returns `Ok(None)` when no artist is selected. On error the previous
    /// state is left untouched so the call can simply be retried.
    pub async fn load_tracks<C, P>(
        &mut self,
        catalog: &C,
        progress: &mut P,
    ) -> Result<Option<&[TrackRecord]>>
    where
        C: Catalog + ?Sized,
        P: ProgressSink + ?Sized,
    {
        let Some(artist) = self.artist.as_ref() else {
            return Ok(None);
        };

        let cache_hit = self
            .cache
            .as_ref()
            .is_some_and(|c| c.artist_id == artist.id);

        if !cache_hit {
            let tracks =
                discography::aggregate(catalog, &artist.id, &artist.name, progress).await?;
            self.cache = Some(TrackCache {
                artist_id: artist.id.clone(),
                tracks,
            });
        }

        Ok(self.cached_tracks())
    }

    /// Cached tracks of the selected artist passing the current filter.
    pub fn filtered_tracks(&self) -> Vec<TrackRecord> {
        self.cached_tracks()
            .map(|tracks| filter::filter(tracks, &self.filter))
            .unwrap_or_default()
    }
}
