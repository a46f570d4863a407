use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    filter::Preset,
    info,
    management::Session,
    playlist::materialize,
    progress::Spinner,
    spotify::{Catalog, SpotifyClient},
    success,
    types::{ArtistRef, FilterSpec, PlaylistDraft, UserProfile},
    utils, warning,
};

const HELP: &str = "\
commands:
  search <artist>      search and select the top hit
  pick <n>             select result n of the last search
  energy <lo..hi>      energy range, e.g. 0.6..1.0
  mood <lo..hi>        mood (valence) range
  era <from..to>       release year range
  deep on|off          keep only tracks with popularity <= the ceiling
  preset <name>        party, sad or old-school
  reset                reset all filters
  show [n]             list the filtered tracks
  create [name]        create a playlist from the filtered tracks
  home                 deselect the artist
  quit                 leave the studio";

/// Interactive session: the discography of the selected artist is fetched once
/// and re-filtered on every change.
pub async fn studio() {
    let client = super::connect().await;

    let user = match client.current_user().await {
        Ok(user) => user,
        Err(e) => return super::report_failure(&e).await,
    };
    info!(
        "Logged in as {}. Type 'help' for commands.",
        user.display_name.as_deref().unwrap_or(&user.id)
    );

    let mut session = Session::new();
    let mut last_results: Vec<ArtistRef> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_prompt(&session);
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warning!("Failed to read input: {}", e);
                break;
            }
        };

        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            "home" => {
                session.clear_artist();
            }
            "search" if !arg.is_empty() => match client.search_artists(arg, 5).await {
                Ok(results) if results.is_empty() => warning!("Artist not found!"),
                Ok(results) => {
                    super::search::print_artists(&results);
                    session.select_artist(results[0].clone());
                    last_results = results;
                    load(&client, &mut session).await;
                }
                Err(e) => super::report_failure(&e).await,
            },
            "pick" => match arg
                .parse::<usize>()
                .ok()
                .and_then(|n| last_results.get(n.wrapping_sub(1)))
            {
                Some(artist) => {
                    session.select_artist(artist.clone());
                    load(&client, &mut session).await;
                }
                None => warning!("No search result {}", arg),
            },
            "energy" => set(utils::parse_unit_range(arg), |b| session.filter.energy = b),
            "mood" => set(utils::parse_unit_range(arg), |b| session.filter.mood = b),
            "era" => set(utils::parse_year_range(arg), |b| session.filter.era = b),
            "deep" => match arg {
                "on" => session.filter.deep_cuts = true,
                "off" => session.filter.deep_cuts = false,
                _ => warning!("Use 'deep on' or 'deep off'"),
            },
            "preset" => set(arg.parse::<Preset>(), |p| {
                session.filter.apply_preset(p);
            }),
            "reset" => session.filter = FilterSpec::default(),
            "show" => show(&session, arg.parse().ok()),
            "create" => create(&client, &session, &user, arg).await,
            _ => warning!("Unknown command '{}'. Type 'help'.", line),
        }
    }
}

fn set<T>(parsed: Result<T, String>, apply: impl FnOnce(T)) {
    match parsed {
        Ok(value) => apply(value),
        Err(e) => warning!("{}", e),
    }
}

fn print_prompt(session: &Session) {
    use std::io::Write;

    match session.artist() {
        Some(artist) => print!(
            "{} [{} tracks | {}]> ",
            artist.name,
            session.filtered_tracks().len(),
            session.filter.describe()
        ),
        None => print!("studio> "),
    }
    let _ = std::io::stdout().flush();
}

async fn load(client: &SpotifyClient, session: &mut Session) {
    if session.cached_tracks().is_some() {
        return;
    }

    let mut spinner = Spinner::start("Fetching discography & analyzing vibes...");
    let result = session
        .load_tracks(client, &mut spinner)
        .await
        .map(|tracks| tracks.map(|t| t.len()));
    spinner.finish();

    match result {
        Ok(Some(count)) => success!("Analysis complete: {} unique tracks", count),
        Ok(None) => {}
        Err(e) => super::report_failure(&e).await,
    }
}

fn show(session: &Session, limit: Option<usize>) {
    if session.artist().is_none() {
        warning!("Select an artist first.");
        return;
    }

    let filtered = session.filtered_tracks();
    info!("Playlist preview ({} tracks)", filtered.len());
    if !filtered.is_empty() {
        super::print_tracks(&filtered, limit.or(Some(25)));
    }
}

async fn create(client: &SpotifyClient, session: &Session, user: &UserProfile, name: &str) {
    let Some(artist) = session.artist() else {
        warning!("Select an artist first.");
        return;
    };

    let filtered = session.filtered_tracks();
    if filtered.is_empty() {
        warning!("No tracks match your filters!");
        return;
    }

    let mut draft = PlaylistDraft::for_artist(artist, &user.id, &session.filter, &filtered);
    if !name.is_empty() {
        draft = draft.with_name(name);
    }

    let mut spinner = Spinner::start("Creating playlist...");
    let result = materialize(client, draft, &mut spinner).await;
    spinner.finish();

    match result {
        Ok(handle) => {
            success!("Playlist '{}' created!", handle.name);
            info!("Open on Spotify: {}", handle.url);
        }
        Err(e) => super::report_failure(&e).await,
    }
}
