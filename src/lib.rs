//! Spotify Playlist Studio Library
//!
//! This library turns an artist's Spotify discography into a filtered playlist.
//! It collects every album and single of an artist, de-duplicates and enriches
//! the tracks with popularity and audio features, applies "vibe" filters and
//! writes the result to a new playlist on the user's account.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `discography` - Discography aggregation and enrichment pipeline
//! - `error` - Error taxonomy shared by the pipeline
//! - `filter` - Vibe, era and popularity filtering
//! - `management` - Token persistence and the in-memory browsing session
//! - `playlist` - Playlist materialization in API-legal chunks
//! - `progress` - Progress sinks for long running operations
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use vibemix::{discography, filter, types::FilterSpec};
//!
//! async fn run(catalog: &impl vibemix::spotify::Catalog) -> vibemix::Result<()> {
//!     let mut sink = |msg: &str| println!("{msg}");
//!     let tracks = discography::aggregate(catalog, "artist-id", "Artist", &mut sink).await?;
//!     let picked = filter::filter(&tracks, &FilterSpec::default());
//!     println!("{} of {} tracks match", picked.len(), tracks.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod discography;
pub mod error;
pub mod filter;
pub mod management;
pub mod playlist;
pub mod progress;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Starting authentication process...");
/// info!("Found {} releases", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist created");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the command handlers in `cli` use it, for fatal errors where recovery
/// is not possible. The pipeline modules return errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
