use std::sync::Arc;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tokio::sync::Mutex;
use vibemix::{
    cli, config, error,
    filter::Preset,
    types::{Bounds, FilterSpec, PkceToken},
    utils,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Forget the stored Spotify token
    Logout,

    /// Search for artists
    Search(SearchOptions),

    /// Preview the filtered discography of an artist
    Tracks(TracksOptions),

    #[clap(about = "Create a playlist from the filtered discography of an artist")]
    Playlist(PlaylistOptions),

    /// Interactive playlist studio
    Studio,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Artist name to search for
    query: String,

    /// Number of results
    #[clap(long, default_value_t = 5)]
    limit: u32,
}

#[derive(Args, Debug, Clone)]
pub struct FilterOptions {
    /// Energy range, e.g. 0.6..1.0
    #[clap(long, value_parser = utils::parse_unit_range)]
    energy: Option<Bounds<f64>>,

    /// Mood (sad ↔ happy) range, e.g. 0.0..0.3
    #[clap(long, value_parser = utils::parse_unit_range)]
    mood: Option<Bounds<f64>>,

    /// Release year range, e.g. 1995..2010
    #[clap(long, value_parser = utils::parse_year_range)]
    era: Option<Bounds<i32>>,

    /// Only keep hidden gems
    #[clap(long)]
    deep_cuts: bool,

    /// Highest popularity still counted as a deep cut
    #[clap(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    max_popularity: Option<u8>,

    /// Start from a preset (party, sad, old-school); explicit ranges win
    #[clap(long, value_parser = parse_preset)]
    preset: Option<Preset>,
}

fn parse_preset(input: &str) -> Result<Preset, String> {
    input.parse()
}

impl FilterOptions {
    fn to_spec(&self) -> FilterSpec {
        let mut spec = FilterSpec::default();
        if let Some(preset) = self.preset {
            spec.apply_preset(preset);
        }
        if let Some(energy) = self.energy {
            spec.energy = energy;
        }
        if let Some(mood) = self.mood {
            spec.mood = mood;
        }
        if let Some(era) = self.era {
            spec.era = era;
        }
        if let Some(ceiling) = self.max_popularity {
            spec.popularity_ceiling = ceiling;
        }
        spec.deep_cuts = self.deep_cuts;
        spec
    }
}

#[derive(Parser, Debug, Clone)]
pub struct TracksOptions {
    /// Artist name; the top search hit is used
    artist: String,

    #[command(flatten)]
    filters: FilterOptions,

    /// Show at most this many tracks
    #[clap(long)]
    limit: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Artist name; the top search hit is used
    artist: String,

    #[command(flatten)]
    filters: FilterOptions,

    /// Playlist name (default "<artist> - Custom Mix")
    #[clap(long)]
    name: Option<String>,

    /// Create the playlist as private
    #[clap(long)]
    private: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Logout => cli::logout().await,
        Command::Search(opt) => cli::search(opt.query, opt.limit).await,
        Command::Tracks(opt) => cli::tracks(opt.artist, opt.filters.to_spec(), opt.limit).await,
        Command::Playlist(opt) => {
            cli::playlist(opt.artist, opt.filters.to_spec(), opt.name, opt.private).await
        }
        Command::Studio => cli::studio().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
