//! Configuration management for the playlist studio.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Only the identity provider consumes credentials;
//! the pipeline itself is configured through plain arguments.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use reqwest::Url;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SCOPE: &str = "user-library-read playlist-modify-public playlist-modify-private";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

/// Directory holding `.env` and the persisted token.
///
/// - Linux: `~/.local/share/vibemix`
/// - macOS: `~/Library/Application Support/vibemix`
/// - Windows: `%LOCALAPPDATA%/vibemix`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("vibemix");
    path
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory if it doesn't exist. A missing `.env` file is not an
/// error since every value may come from the process environment instead.
///
/// # Example
///
/// ```
/// use vibemix::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    } else {
        log::debug!("no .env at {}, using process environment", path.display());
    }
    Ok(())
}

fn required(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{} must be set", name))),
    }
}

fn optional(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Credentials of the registered Spotify application.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl Credentials {
    /// Reads `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and `SPOTIFY_REDIRECT_URI`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
        })
    }
}

/// Returns the Spotify Web API base URL, e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    optional("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    optional("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Returns the space separated scopes requested during authorization.
pub fn spotify_scope() -> String {
    optional("SPOTIFY_SCOPE", DEFAULT_SCOPE)
}

/// Returns the address the local callback server binds to.
///
/// Uses `SERVER_ADDRESS` when set, otherwise [`redirect_server_addr`].
pub fn server_addr(redirect_uri: &str) -> String {
    match env::var("SERVER_ADDRESS") {
        Ok(addr) if !addr.trim().is_empty() => addr,
        _ => redirect_server_addr(redirect_uri),
    }
}

/// Loopback address on the port of the redirect URI.
pub fn redirect_server_addr(redirect_uri: &str) -> String {
    match Url::parse(redirect_uri) {
        Ok(url) => format!("127.0.0.1:{}", url.port_or_known_default().unwrap_or(8888)),
        Err(_) => DEFAULT_SERVER_ADDRESS.to_string(),
    }
}

/// Returns the path component of the redirect URI the callback route is mounted on.
pub fn callback_path(redirect_uri: &str) -> String {
    Url::parse(redirect_uri)
        .map(|u| u.path().to_string())
        .ok()
        .filter(|p| p != "/")
        .unwrap_or_else(|| "/callback".to_string())
}
