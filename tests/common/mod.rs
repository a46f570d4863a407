#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use vibemix::{
    Error, Result,
    spotify::Catalog,
    types::{
        AlbumArtist, ArtistRef, AudioFeatures, AudioFeaturesObject, FullTrack, Page,
        PlaylistHandle, Release, ReleaseTrack, TrackRecord, UserProfile,
    },
    utils::ReleaseKinds,
};

/// Every request the pipeline made against a [`FakeCatalog`].
#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub release_pages: Vec<String>,
    pub track_pages: Vec<String>,
    pub popularity_batches: Vec<usize>,
    pub feature_batches: Vec<usize>,
    pub created: Vec<(String, String, bool)>,
    pub appended: Vec<Vec<String>>,
}

/// Scripted in-memory catalog. Pages are served `page_size` items at a time
/// with the next offset as cursor.
pub struct FakeCatalog {
    pub user_id: String,
    pub artists: Vec<ArtistRef>,
    pub releases: HashMap<String, Vec<Release>>,
    pub tracks: HashMap<String, Vec<ReleaseTrack>>,
    pub popularity: HashMap<String, u8>,
    pub features: HashMap<String, AudioFeaturesObject>,
    pub release_page_size: usize,
    pub track_page_size: usize,
    pub fail_releases: AtomicBool,
    pub fail_tracks_of: Option<String>,
    pub fail_popularity_batches: HashSet<usize>,
    pub fail_feature_batches: HashSet<usize>,
    pub fail_create: bool,
    pub fail_append_at: Option<usize>,
    pub calls: Mutex<Calls>,
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self {
            user_id: "user-1".to_string(),
            artists: Vec::new(),
            releases: HashMap::new(),
            tracks: HashMap::new(),
            popularity: HashMap::new(),
            features: HashMap::new(),
            release_page_size: 50,
            track_page_size: 50,
            fail_releases: AtomicBool::new(false),
            fail_tracks_of: None,
            fail_popularity_batches: HashSet::new(),
            fail_feature_batches: HashSet::new(),
            fail_create: false,
            fail_append_at: None,
            calls: Mutex::new(Calls::default()),
        }
    }
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a release of `artist_id` with its tracks.
    pub fn with_release(
        mut self,
        artist_id: &str,
        release: Release,
        tracks: Vec<ReleaseTrack>,
    ) -> Self {
        self.tracks.insert(release.id.clone(), tracks);
        self.releases
            .entry(artist_id.to_string())
            .or_default()
            .push(release);
        self
    }

    pub fn with_popularity(mut self, track_id: &str, popularity: u8) -> Self {
        self.popularity.insert(track_id.to_string(), popularity);
        self
    }

    pub fn with_features(mut self, track_id: &str, energy: f64, valence: f64) -> Self {
        self.features
            .insert(track_id.to_string(), features(track_id, energy, valence));
        self
    }

    pub fn set_fail_releases(&self, fail: bool) {
        self.fail_releases.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().unwrap().clone()
    }
}

fn api_error(message: &str) -> Error {
    Error::Api {
        status: 500,
        message: message.to_string(),
    }
}

fn page_of<T: Clone>(items: &[T], page_size: usize, cursor: Option<&str>) -> Page<T> {
    let offset: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
    let end = (offset + page_size).min(items.len());
    let start = offset.min(end);
    Page {
        items: items[start..end].to_vec(),
        next: (end < items.len()).then(|| end.to_string()),
        total: Some(items.len() as u64),
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn current_user(&self) -> Result<UserProfile> {
        Ok(UserProfile {
            id: self.user_id.clone(),
            display_name: None,
        })
    }

    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistRef>> {
        let query = query.to_lowercase();
        Ok(self
            .artists
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&query))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_artist_releases(
        &self,
        artist_id: &str,
        kinds: &ReleaseKinds,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<Page<Release>> {
        assert_eq!(kinds, &ReleaseKinds::discography());
        assert!(page_size <= 50);
        self.calls
            .lock()
            .unwrap()
            .release_pages
            .push(artist_id.to_string());

        if self.fail_releases.load(Ordering::SeqCst) {
            return Err(api_error("releases unavailable"));
        }

        let releases = self.releases.get(artist_id).cloned().unwrap_or_default();
        Ok(page_of(&releases, self.release_page_size, cursor))
    }

    async fn list_release_tracks(
        &self,
        release_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<ReleaseTrack>> {
        self.calls
            .lock()
            .unwrap()
            .track_pages
            .push(release_id.to_string());

        if self.fail_tracks_of.as_deref() == Some(release_id) {
            return Err(api_error("tracks unavailable"));
        }

        let tracks = self.tracks.get(release_id).cloned().unwrap_or_default();
        Ok(page_of(&tracks, self.track_page_size, cursor))
    }

    async fn get_tracks(&self, ids: &[String]) -> Result<Vec<Option<FullTrack>>> {
        assert!(ids.len() <= 50);
        let batch = {
            let mut calls = self.calls.lock().unwrap();
            calls.popularity_batches.push(ids.len());
            calls.popularity_batches.len() - 1
        };

        if self.fail_popularity_batches.contains(&batch) {
            return Err(api_error("tracks endpoint down"));
        }

        Ok(ids
            .iter()
            .map(|id| {
                self.popularity.get(id).map(|&popularity| FullTrack {
                    id: id.clone(),
                    popularity,
                })
            })
            .collect())
    }

    async fn get_audio_features(
        &self,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeaturesObject>>> {
        assert!(ids.len() <= 100);
        let batch = {
            let mut calls = self.calls.lock().unwrap();
            calls.feature_batches.push(ids.len());
            calls.feature_batches.len() - 1
        };

        if self.fail_feature_batches.contains(&batch) {
            return Err(api_error("audio features endpoint down"));
        }

        Ok(ids.iter().map(|id| self.features.get(id).cloned()).collect())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<PlaylistHandle> {
        assert_eq!(user_id, self.user_id);
        self.calls.lock().unwrap().created.push((
            name.to_string(),
            description.to_string(),
            public,
        ));

        if self.fail_create {
            return Err(api_error("cannot create playlist"));
        }

        Ok(PlaylistHandle {
            id: "playlist-1".to_string(),
            name: name.to_string(),
            url: "https://open.spotify.com/playlist/playlist-1".to_string(),
        })
    }

    async fn add_tracks_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<()> {
        assert_eq!(playlist_id, "playlist-1");
        assert!(uris.len() <= 100);
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.appended.push(uris.to_vec());
            calls.appended.len() - 1
        };

        if self.fail_append_at == Some(call) {
            return Err(api_error("cannot add tracks"));
        }
        Ok(())
    }
}

pub fn artist(id: &str, name: &str) -> ArtistRef {
    ArtistRef {
        id: id.to_string(),
        name: name.to_string(),
        image_url: None,
        followers: 1000,
        popularity: 50,
        url: format!("https://open.spotify.com/artist/{}", id),
    }
}

pub fn release(id: &str, name: &str, release_date: Option<&str>) -> Release {
    Release {
        id: id.to_string(),
        name: name.to_string(),
        release_date: release_date.map(str::to_string),
        album_type: "album".to_string(),
    }
}

pub fn track(id: &str, name: &str, artist_ids: &[&str]) -> ReleaseTrack {
    ReleaseTrack {
        id: id.to_string(),
        name: name.to_string(),
        uri: format!("spotify:track:{}", id),
        duration_ms: 200_000,
        artists: artist_ids
            .iter()
            .map(|a| AlbumArtist {
                id: a.to_string(),
                name: format!("Artist {}", a),
            })
            .collect(),
    }
}

pub fn features(id: &str, energy: f64, valence: f64) -> AudioFeaturesObject {
    AudioFeaturesObject {
        id: id.to_string(),
        energy,
        valence,
        danceability: 0.7,
        tempo: 128.0,
        instrumentalness: 0.1,
    }
}

/// An already enriched record, for filter tests.
pub fn record(id: &str, year: i32, popularity: u8, energy: f64, valence: f64) -> TrackRecord {
    TrackRecord {
        id: id.to_string(),
        name: format!("Track {}", id),
        album: "Album".to_string(),
        release_year: year,
        duration_ms: 180_000,
        uri: format!("spotify:track:{}", id),
        popularity,
        features: AudioFeatures {
            energy,
            valence,
            ..AudioFeatures::default()
        },
    }
}

/// `count` tracks `t000`, `t001`, ... all crediting `artist_id`.
pub fn numbered_tracks(artist_id: &str, count: usize) -> Vec<ReleaseTrack> {
    (0..count)
        .map(|i| track(&format!("t{:03}", i), &format!("Song {}", i), &[artist_id]))
        .collect()
}
