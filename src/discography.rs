//! Discography aggregation.
//!
//! Turns an artist id into a de-duplicated list of [`TrackRecord`]s enriched
//! with popularity and audio features:
//!
//! 1. list every album and single of the artist, page by page
//! 2. list every track of each release, page by page
//! 3. keep tracks crediting the artist, first occurrence per normalized name
//! 4. fetch popularity in batches of [`POPULARITY_BATCH_SIZE`]
//! 5. fetch audio features in batches of [`FEATURES_BATCH_SIZE`]
//!
//! Listing failures abort the aggregation. Enrichment failures only degrade
//! the affected batch to defaults.

use std::collections::HashSet;

use log::{debug, warn};

use crate::{
    error::{EnrichmentError, Error, Result},
    progress::ProgressSink,
    spotify::{
        self, Catalog, MAX_AUDIO_FEATURES_PER_REQUEST, MAX_PAGE_SIZE, MAX_TRACKS_PER_REQUEST,
    },
    types::{
        AudioFeatures, AudioFeaturesObject, DEFAULT_RELEASE_YEAR, FullTrack, Release, ReleaseTrack,
        TrackRecord,
    },
    utils::ReleaseKinds,
};

pub const RELEASES_PAGE_SIZE: u32 = MAX_PAGE_SIZE;
pub const POPULARITY_BATCH_SIZE: usize = MAX_TRACKS_PER_REQUEST;
pub const FEATURES_BATCH_SIZE: usize = MAX_AUDIO_FEATURES_PER_REQUEST;

/// De-duplication key: trimmed and case-folded track name.
///
/// Remixes and live versions are not told apart from the original; two
/// different songs sharing a title collapse into one.
pub fn dedup_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether `artist_id` is credited on the track, as primary or featured artist.
pub fn credits_artist(track: &ReleaseTrack, artist_id: &str) -> bool {
    track.artists.iter().any(|a| a.id == artist_id)
}

/// Year from the first four characters of a release date, 2000 when missing,
/// empty or not numeric. Shorter dates use whatever characters there are.
pub fn parse_release_year(release_date: Option<&str>) -> i32 {
    release_date
        .map(|date| date.chars().take(4).collect::<String>())
        .filter(|year| !year.is_empty() && year.chars().all(|c| c.is_ascii_digit()))
        .and_then(|year| year.parse().ok())
        .unwrap_or(DEFAULT_RELEASE_YEAR)
}

/// Accumulates unique, credited tracks in encounter order.
#[derive(Debug, Default)]
pub struct TrackCollector {
    artist_id: String,
    seen: HashSet<String>,
    records: Vec<TrackRecord>,
}

impl TrackCollector {
    pub fn new(artist_id: &str) -> Self {
        Self {
            artist_id: artist_id.to_string(),
            ..Default::default()
        }
    }

    /// Records the track unless it lacks the artist credit or its name was
    /// already seen. Returns whether it was kept.
    pub fn offer(&mut self, release: &Release, track: ReleaseTrack) -> bool {
        if !credits_artist(&track, &self.artist_id) {
            return false;
        }
        if !self.seen.insert(dedup_key(&track.name)) {
            return false;
        }

        self.records.push(TrackRecord {
            id: track.id,
            name: track.name,
            album: release.name.clone(),
            release_year: parse_release_year(release.release_date.as_deref()),
            duration_ms: track.duration_ms,
            uri: track.uri,
            popularity: 0,
            features: AudioFeatures::default(),
        });
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<TrackRecord> {
        self.records
    }
}

/// Outcome of one enrichment batch. A failed batch is a value, not an error,
/// so the fallback path is an explicit branch.
#[derive(Debug)]
pub enum Enrichment<T> {
    /// One entry per requested id; `None` where the item is unavailable.
    Fetched(Vec<Option<T>>),
    Fallback(EnrichmentError),
}

/// Sets popularity for one batch of records. Unavailable items and failed
/// batches get popularity 0.
pub fn apply_popularity(records: &mut [TrackRecord], batch: &Enrichment<FullTrack>) {
    for (i, record) in records.iter_mut().enumerate() {
        record.popularity = match batch {
            Enrichment::Fetched(tracks) => tracks
                .get(i)
                .and_then(Option::as_ref)
                .map(|t| t.popularity.min(100))
                .unwrap_or(0),
            Enrichment::Fallback(_) => 0,
        };
    }
}

/// Merges audio features for one batch of records. Unavailable items and
/// failed batches get the default feature values.
pub fn apply_features(records: &mut [TrackRecord], batch: &Enrichment<AudioFeaturesObject>) {
    for (i, record) in records.iter_mut().enumerate() {
        record.features = match batch {
            Enrichment::Fetched(features) => features
                .get(i)
                .and_then(Option::as_ref)
                .map(AudioFeatures::from)
                .unwrap_or_default(),
            Enrichment::Fallback(_) => AudioFeatures::default(),
        };
    }
}

async fn fetch_popularity<C>(catalog: &C, batch: usize, ids: &[String]) -> Enrichment<FullTrack>
where
    C: Catalog + ?Sized,
{
    match catalog.get_tracks(ids).await {
        Ok(tracks) => Enrichment::Fetched(tracks),
        Err(source) => Enrichment::Fallback(EnrichmentError {
            stage: "popularity",
            batch,
            size: ids.len(),
            source,
        }),
    }
}

async fn fetch_features<C>(
    catalog: &C,
    batch: usize,
    ids: &[String],
) -> Enrichment<AudioFeaturesObject>
where
    C: Catalog + ?Sized,
{
    match catalog.get_audio_features(ids).await {
        Ok(features) => Enrichment::Fetched(features),
        Err(source) => Enrichment::Fallback(EnrichmentError {
            stage: "audio features",
            batch,
            size: ids.len(),
            source,
        }),
    }
}

/// Lists every album and single of the artist.
pub async fn list_releases<C>(catalog: &C, artist_id: &str) -> Result<Vec<Release>>
where
    C: Catalog + ?Sized,
{
    let kinds = ReleaseKinds::discography();
    spotify::paginate(|cursor| {
        let kinds = &kinds;
        async move {
            catalog
                .list_artist_releases(artist_id, kinds, RELEASES_PAGE_SIZE, cursor.as_deref())
                .await
        }
    })
    .await
}

/// Lists every track of a release.
pub async fn list_tracks<C>(catalog: &C, release_id: &str) -> Result<Vec<ReleaseTrack>>
where
    C: Catalog + ?Sized,
{
    spotify::paginate(|cursor| async move {
        catalog
            .list_release_tracks(release_id, cursor.as_deref())
            .await
    })
    .await
}

/// Builds the enriched, de-duplicated discography of an artist.
///
/// # Errors
///
/// Returns [`Error::Listing`] when a release or track page cannot be fetched.
/// No partial list is returned in that case. Popularity and audio-feature
/// failures never surface.
pub async fn aggregate<C, P>(
    catalog: &C,
    artist_id: &str,
    artist_name: &str,
    progress: &mut P,
) -> Result<Vec<TrackRecord>>
where
    C: Catalog + ?Sized,
    P: ProgressSink + ?Sized,
{
    progress.report(&format!("Fetching releases of {}...", artist_name));
    let releases = list_releases(catalog, artist_id)
        .await
        .map_err(|e| Error::listing(format!("releases of {}", artist_name), e))?;
    progress.report(&format!(
        "Found {} releases. Fetching tracks...",
        releases.len()
    ));

    let mut collector = TrackCollector::new(artist_id);
    for release in &releases {
        let tracks = list_tracks(catalog, &release.id)
            .await
            .map_err(|e| Error::listing(format!("tracks of '{}'", release.name), e))?;
        let offered = tracks.len();
        let mut kept = 0;
        for track in tracks {
            if collector.offer(release, track) {
                kept += 1;
            }
        }
        debug!("{}: kept {} of {} tracks", release.name, kept, offered);
    }

    let mut records = collector.into_records();
    progress.report(&format!("Found {} unique tracks.", records.len()));
    if records.is_empty() {
        return Ok(records);
    }

    let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();

    progress.report("Fetching popularity scores...");
    for (batch, (id_chunk, record_chunk)) in ids
        .chunks(POPULARITY_BATCH_SIZE)
        .zip(records.chunks_mut(POPULARITY_BATCH_SIZE))
        .enumerate()
    {
        let enrichment = fetch_popularity(catalog, batch, id_chunk).await;
        if let Enrichment::Fallback(e) = &enrichment {
            warn!("{}, using popularity 0", e);
        }
        apply_popularity(record_chunk, &enrichment);
    }

    progress.report("Analyzing audio features (vibes)...");
    for (batch, (id_chunk, record_chunk)) in ids
        .chunks(FEATURES_BATCH_SIZE)
        .zip(records.chunks_mut(FEATURES_BATCH_SIZE))
        .enumerate()
    {
        let enrichment = fetch_features(catalog, batch, id_chunk).await;
        if let Enrichment::Fallback(e) = &enrichment {
            warn!("{}, using default features", e);
        }
        apply_features(record_chunk, &enrichment);
    }

    progress.report(&format!(
        "Analysis complete: {} tracks of {}.",
        records.len(),
        artist_name
    ));
    Ok(records)
}
