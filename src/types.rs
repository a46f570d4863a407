use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils::format_duration;

pub const DEFAULT_RELEASE_YEAR: i32 = 2000;
pub const DEFAULT_ENERGY: f64 = 0.5;
pub const DEFAULT_VALENCE: f64 = 0.5;
pub const DEFAULT_DANCEABILITY: f64 = 0.5;
pub const DEFAULT_TEMPO: f64 = 120.0;
pub const DEFAULT_INSTRUMENTALNESS: f64 = 0.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
    pub error: Option<String>,
}

/// An artist as returned by search. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub followers: u64,
    pub popularity: u8,
    pub url: String,
}

impl From<ArtistObject> for ArtistRef {
    fn from(a: ArtistObject) -> ArtistRef {
        ArtistRef {
            id: a.id,
            name: a.name,
            image_url: a.images.into_iter().next().map(|i| i.url),
            followers: a.followers.map(|f| f.total).unwrap_or(0),
            popularity: a.popularity.unwrap_or(0),
            url: a.external_urls.spotify.unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub followers: u64,
    pub popularity: u8,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64,
    pub tempo: f64,
    pub instrumentalness: f64,
}

impl Default for AudioFeatures {
    fn default() -> Self {
        Self {
            energy: DEFAULT_ENERGY,
            valence: DEFAULT_VALENCE,
            danceability: DEFAULT_DANCEABILITY,
            tempo: DEFAULT_TEMPO,
            instrumentalness: DEFAULT_INSTRUMENTALNESS,
        }
    }
}

impl From<&AudioFeaturesObject> for AudioFeatures {
    fn from(f: &AudioFeaturesObject) -> Self {
        Self {
            energy: f.energy,
            valence: f.valence,
            danceability: f.danceability,
            tempo: f.tempo,
            instrumentalness: f.instrumentalness,
        }
    }
}

/// One de-duplicated track of an artist's discography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    pub name: String,
    pub album: String,
    pub release_year: i32,
    pub duration_ms: u64,
    pub uri: String,
    /// 0 until enriched, and when enrichment fails.
    pub popularity: u8,
    /// Fallback defaults until enriched, and when enrichment fails.
    pub features: AudioFeatures,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub title: String,
    pub album: String,
    pub year: i32,
    pub length: String,
    pub pop: u8,
    pub energy: String,
    pub mood: String,
}

impl From<&TrackRecord> for TrackTableRow {
    fn from(t: &TrackRecord) -> Self {
        TrackTableRow {
            title: t.name.clone(),
            album: t.album.clone(),
            year: t.release_year,
            length: format_duration(t.duration_ms),
            pop: t.popularity,
            energy: format!("{}%", (t.features.energy * 100.0) as u32),
            mood: format!("{}%", (t.features.valence * 100.0) as u32),
        }
    }
}

/// Inclusive `[lo, hi]` interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub lo: T,
    pub hi: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(lo: T, hi: T) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, value: T) -> bool {
        self.lo <= value && value <= self.hi
    }
}

/// Filter parameters recomputed from user input on every render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub energy: Bounds<f64>,
    pub mood: Bounds<f64>,
    pub era: Bounds<i32>,
    pub deep_cuts: bool,
    /// Highest popularity still counted as a deep cut.
    pub popularity_ceiling: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistDraft {
    pub name: String,
    pub description: String,
    pub user_id: String,
    pub uris: Vec<String>,
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistHandle {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl From<PlaylistObject> for PlaylistHandle {
    fn from(p: PlaylistObject) -> Self {
        let url = p
            .external_urls
            .spotify
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", p.id));
        PlaylistHandle {
            id: p.id,
            name: p.name,
            url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
}

// Spotify Web API wire types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Followers {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub followers: Option<Followers>,
    pub popularity: Option<u8>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchArtistsResponse {
    pub artists: Page<ArtistObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumArtist {
    pub id: String,
    pub name: String,
}

/// An album or single of an artist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    pub name: String,
    pub release_date: Option<String>,
    #[serde(default)]
    pub album_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub duration_ms: u64,
    pub artists: Vec<AlbumArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullTrack {
    pub id: String,
    pub popularity: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSeveralTracksResponse {
    pub tracks: Vec<Option<FullTrack>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesObject {
    pub id: String,
    pub energy: f64,
    pub valence: f64,
    pub danceability: f64,
    pub tempo: f64,
    pub instrumentalness: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSeveralAudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeaturesObject>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}
