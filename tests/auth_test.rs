use std::sync::Arc;

use chrono::Utc;
use tokio::{net::TcpListener, sync::Mutex};
use vibemix::{
    Error,
    config::Credentials,
    server,
    spotify::auth::{SpotifyAuth, is_expired},
    types::{PkceToken, PlaylistHandle, Token},
};

// Helper function to create a token obtained `age` seconds ago
fn token_aged(age: u64, expires_in: u64) -> Token {
    Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        scope: "playlist-modify-public".to_string(),
        expires_in,
        obtained_at: Utc::now().timestamp() as u64 - age,
    }
}

fn api_error(status: u16) -> Error {
    Error::Api {
        status,
        message: "boom".to_string(),
    }
}

fn identity() -> Arc<SpotifyAuth> {
    Arc::new(SpotifyAuth::new(Credentials {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
    }))
}

#[test]
fn test_is_expired() {
    // Fresh token with an hour left
    assert!(!is_expired(&token_aged(0, 3600)));

    // Still outside the 240s margin
    assert!(!is_expired(&token_aged(3000, 3600)));

    // Inside the margin counts as expired
    assert!(is_expired(&token_aged(3400, 3600)));
    assert!(is_expired(&token_aged(0, 200)));

    // Long gone
    assert!(is_expired(&token_aged(7200, 3600)));
    assert!(is_expired(&token_aged(0, 0)));
}

#[test]
fn test_requires_reauth() {
    assert!(Error::Auth("refresh rejected".to_string()).requires_reauth());
    assert!(api_error(401).requires_reauth());

    assert!(!api_error(500).requires_reauth());
    assert!(!api_error(429).requires_reauth());
    assert!(!Error::Config("SPOTIFY_CLIENT_ID must be set".to_string()).requires_reauth());
    assert!(!Error::EmptyPlaylist("Mix".to_string()).requires_reauth());
}

#[test]
fn test_requires_reauth_looks_through_context() {
    assert!(Error::listing("releases of X", api_error(401)).requires_reauth());
    assert!(!Error::listing("releases of X", api_error(500)).requires_reauth());

    let create = Error::PlaylistCreate {
        name: "Mix".to_string(),
        source: Box::new(Error::Auth("expired".to_string())),
    };
    assert!(create.requires_reauth());

    let append = Error::PlaylistAppend {
        playlist: PlaylistHandle {
            id: "p".to_string(),
            name: "Mix".to_string(),
            url: "https://open.spotify.com/playlist/p".to_string(),
        },
        chunks_added: 1,
        tracks_added: 100,
        source: Box::new(api_error(503)),
    };
    assert!(!append.requires_reauth());
}

#[test]
fn test_authorization_url() {
    let url = identity().authorization_url("challenge123").unwrap();
    let query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let get = |key: &str| {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    assert_eq!(get("client_id"), Some("client"));
    assert_eq!(get("response_type"), Some("code"));
    assert_eq!(get("code_challenge"), Some("challenge123"));
    assert_eq!(get("code_challenge_method"), Some("S256"));
    assert_eq!(get("redirect_uri"), Some("http://127.0.0.1:8888/callback"));
}

// Serves the callback router on an ephemeral port and returns its base URL
async fn spawn_server(state: Arc<Mutex<Option<PkceToken>>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, state, identity()));
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_callback_server_health() {
    let base = spawn_server(Arc::new(Mutex::new(None))).await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "vibemix");
}

#[tokio::test]
async fn test_callback_records_denied_login() {
    let state = Arc::new(Mutex::new(Some(PkceToken {
        code_verifier: "verifier".to_string(),
        token: None,
        error: None,
    })));
    let base = spawn_server(Arc::clone(&state)).await;

    let html = reqwest::get(format!("{}/callback?error=access_denied", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("cancelled"));
    let lock = state.lock().await;
    let pkce = lock.as_ref().unwrap();
    assert!(pkce.token.is_none());
    assert!(pkce.error.as_deref().unwrap().contains("access_denied"));
}

#[tokio::test]
async fn test_callback_without_code_or_verifier() {
    let base = spawn_server(Arc::new(Mutex::new(None))).await;
    let html = reqwest::get(format!("{}/callback?code=abc", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Missing PKCE code verifier"));

    let state = Arc::new(Mutex::new(Some(PkceToken {
        code_verifier: "verifier".to_string(),
        token: None,
        error: None,
    })));
    let base = spawn_server(Arc::clone(&state)).await;
    let html = reqwest::get(format!("{}/callback", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Missing authorization code"));
    assert!(state.lock().await.as_ref().unwrap().error.is_none());
}
