use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config::{self, Credentials},
    error::{Error, Result},
    server::start_api_server,
    types::{PkceToken, Token},
    utils, warning,
};

/// Seconds before the real expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    scope: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// Identity provider client for the Spotify accounts service.
///
/// Uses the authorization code flow with PKCE. The client secret is sent as
/// HTTP basic auth on the token endpoint.
#[derive(Debug, Clone)]
pub struct SpotifyAuth {
    http: Client,
    credentials: Credentials,
    auth_url: String,
    token_url: String,
    scope: String,
}

impl SpotifyAuth {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: Client::new(),
            credentials,
            auth_url: config::spotify_apiauth_url(),
            token_url: config::spotify_apitoken_url(),
            scope: config::spotify_scope(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Credentials::from_env()?))
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Builds the URL the user visits to grant access.
    pub fn authorization_url(&self, code_challenge: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("code_challenge", code_challenge),
                ("code_challenge_method", "S256"),
                ("scope", self.scope.as_str()),
                ("show_dialog", "true"),
            ],
        )
        .map_err(|e| {
            Error::Config(format!(
                "invalid authorization url '{}': {}",
                self.auth_url, e
            ))
        })
    }

    /// Exchanges an authorization code for an access/refresh token pair.
    pub async fn exchange_code(&self, code: &str, verifier: &str) -> Result<Token> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];
        let res = self.request_token(&form).await?;
        let refresh_token = res
            .refresh_token
            .clone()
            .ok_or_else(|| Error::Auth("token response carried no refresh token".to_string()))?;
        Ok(into_token(res, refresh_token))
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// Spotify may omit the refresh token from the response, in which case the
    /// old one stays valid and is kept.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        let res = self.request_token(&form).await?;
        let refresh_token = res
            .refresh_token
            .clone()
            .unwrap_or_else(|| refresh_token.to_string());
        Ok(into_token(res, refresh_token))
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(form)
            .send()
            .await
            .map_err(|e| Error::Auth(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Auth(e.to_string()))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{} ({})", err.error, desc),
                    None => err.error,
                },
                Err(_) => format!("token endpoint answered {}", status),
            };
            return Err(Error::Auth(message));
        }

        serde_json::from_str::<TokenResponse>(&body)
            .map_err(|e| Error::Auth(format!("malformed token response: {}", e)))
    }
}

fn into_token(res: TokenResponse, refresh_token: String) -> Token {
    Token {
        access_token: res.access_token,
        refresh_token,
        scope: res.scope.unwrap_or_default(),
        expires_in: res.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    }
}

/// Whether `token` is expired or about to expire.
pub fn is_expired(token: &Token) -> bool {
    let now = Utc::now().timestamp() as u64;
    let valid_until = (token.obtained_at + token.expires_in).saturating_sub(EXPIRY_MARGIN_SECS);
    now >= valid_until
}

/// Runs the complete interactive authorization flow.
///
/// 1. Generates a PKCE code verifier and challenge
/// 2. Starts the local callback server on the redirect URI's port
/// 3. Opens the authorization URL in the default browser
/// 4. Waits for the callback handler to exchange the code
pub async fn auth(
    identity: Arc<SpotifyAuth>,
    shared_state: Arc<Mutex<Option<PkceToken>>>,
) -> Result<Token> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let auth_url = identity.authorization_url(&code_challenge)?;

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
            error: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    let server_identity = Arc::clone(&identity);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state, server_identity).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    wait_for_token(shared_state).await
}

/// Polls the shared state until the callback handler stored a token or an
/// error, or until the timeout is reached.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Ok(token.clone());
            }
            if let Some(error) = &pkce_token.error {
                return Err(Error::Auth(error.clone()));
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err(Error::Auth(
        "timed out waiting for the authorization callback".to_string(),
    ))
}
