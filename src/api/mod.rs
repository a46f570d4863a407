//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that runs while the
//! user authorizes the application in the browser.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the redirect from Spotify's authorization server and
//!   exchanges the authorization code (plus PKCE verifier) for a token. The
//!   route path follows the path of the configured redirect URI.
//! - [`health`] - Returns service name and version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use vibemix::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
