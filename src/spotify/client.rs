use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config,
    error::{Error, Result},
    management::TokenManager,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, ArtistRef, AudioFeaturesObject,
        CreatePlaylistRequest, FullTrack, GetSeveralAudioFeaturesResponse,
        GetSeveralTracksResponse, Page, PlaylistHandle, PlaylistObject, Release, ReleaseTrack,
        SearchArtistsResponse, UserProfile,
    },
    utils::ReleaseKinds,
};

use super::{Catalog, MAX_PAGE_SIZE};

const MAX_ATTEMPTS: u32 = 3;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);
const MAX_RETRY_AFTER_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Spotify Web API client authenticated with a user token.
///
/// The token manager sits behind a mutex so that an expired token can be
/// refreshed from `&self` trait methods.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    pub fn new(tokens: TokenManager) -> Self {
        Self::with_api_url(tokens, config::spotify_apiurl())
    }

    pub fn with_api_url(tokens: TokenManager, api_url: String) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            tokens: Mutex::new(tokens),
        }
    }

    async fn access_token(&self) -> Result<String> {
        self.tokens.lock().await.get_valid_token().await
    }

    /// Sends the request built by `build`, retrying on 502 Bad Gateway and on
    /// 429 Too Many Requests when `Retry-After` is reasonable.
    async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let token = self.access_token().await?;
            let response = build(&self.http).bearer_auth(&token).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if attempt < MAX_ATTEMPTS {
                if status == StatusCode::BAD_GATEWAY {
                    log::warn!("Spotify answered 502, retrying in {:?}", BAD_GATEWAY_DELAY);
                    sleep(BAD_GATEWAY_DELAY).await;
                    continue;
                }

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = retry_after_secs(&response);
                    if retry_after <= MAX_RETRY_AFTER_SECS {
                        log::warn!("rate limited, retrying in {}s", retry_after);
                        sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }
                    log::warn!(
                        "Retry-After of {}s is abnormally high, giving up",
                        retry_after
                    );
                }
            }

            return Err(api_error(response).await);
        }
    }

    async fn get_json<T, F>(&self, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = self.send(build).await?;
        Ok(response.json::<T>().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(1)
}

async fn api_error(response: Response) -> Error {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.is_empty() => "no response body".to_string(),
        Err(_) => body,
    };
    Error::Api { status, message }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn current_user(&self) -> Result<UserProfile> {
        let url = self.url("/me");
        self.get_json(|c| c.get(&url)).await
    }

    async fn search_artists(&self, query: &str, limit: u32) -> Result<Vec<ArtistRef>> {
        let url = self.url("/search");
        let limit = limit.clamp(1, MAX_PAGE_SIZE).to_string();
        let res: SearchArtistsResponse = self
            .get_json(|c| {
                c.get(&url)
                    .query(&[("q", query), ("type", "artist"), ("limit", limit.as_str())])
            })
            .await?;

        Ok(res.artists.items.into_iter().map(ArtistRef::from).collect())
    }

    async fn list_artist_releases(
        &self,
        artist_id: &str,
        kinds: &ReleaseKinds,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<Page<Release>> {
        if let Some(next) = cursor {
            return self.get_json(|c| c.get(next)).await;
        }

        let url = self.url(&format!("/artists/{}/albums", artist_id));
        let include_groups = kinds.to_string();
        let limit = page_size.clamp(1, MAX_PAGE_SIZE).to_string();
        self.get_json(|c| {
            c.get(&url)
                .query(&[("include_groups", &include_groups), ("limit", &limit)])
        })
        .await
    }

    async fn list_release_tracks(
        &self,
        release_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<ReleaseTrack>> {
        if let Some(next) = cursor {
            return self.get_json(|c| c.get(next)).await;
        }

        let url = self.url(&format!("/albums/{}/tracks", release_id));
        let limit = MAX_PAGE_SIZE.to_string();
        self.get_json(|c| c.get(&url).query(&[("limit", &limit)]))
            .await
    }

    async fn get_tracks(&self, ids: &[String]) -> Result<Vec<Option<FullTrack>>> {
        let url = self.url("/tracks");
        let ids = ids.join(",");
        let res: GetSeveralTracksResponse =
            self.get_json(|c| c.get(&url).query(&[("ids", &ids)])).await?;
        Ok(res.tracks)
    }

    async fn get_audio_features(&self, ids: &[String]) -> Result<Vec<Option<AudioFeaturesObject>>> {
        let url = self.url("/audio-features");
        let ids = ids.join(",");
        let res: GetSeveralAudioFeaturesResponse =
            self.get_json(|c| c.get(&url).query(&[("ids", &ids)])).await?;
        Ok(res.audio_features)
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<PlaylistHandle> {
        let url = self.url(&format!("/users/{}/playlists", user_id));
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
            collaborative: false,
        };
        let playlist: PlaylistObject = self.get_json(|c| c.post(&url).json(&body)).await?;
        Ok(PlaylistHandle::from(playlist))
    }

    async fn add_tracks_to_playlist(&self, playlist_id: &str, uris: &[String]) -> Result<()> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };
        let res: AddTrackToPlaylistResponse = self.get_json(|c| c.post(&url).json(&body)).await?;
        log::debug!("playlist {} now at snapshot {}", playlist_id, res.snapshot_id);
        Ok(())
    }
}
