use crate::{
    discography, filter, info,
    playlist::materialize,
    progress::Spinner,
    spotify::Catalog,
    success,
    types::{FilterSpec, PlaylistDraft},
    warning,
};

pub async fn playlist(artist_query: String, spec: FilterSpec, name: Option<String>, private: bool) {
    let client = super::connect().await;

    let user = match client.current_user().await {
        Ok(user) => user,
        Err(e) => return super::report_failure(&e).await,
    };
    info!(
        "Logged in as {}",
        user.display_name.as_deref().unwrap_or(&user.id)
    );

    let artist = match super::resolve_artist(&client, &artist_query).await {
        Ok(Some(artist)) => artist,
        Ok(None) => {
            warning!("Artist not found!");
            return;
        }
        Err(e) => return super::report_failure(&e).await,
    };

    let mut spinner = Spinner::start("Fetching discography & analyzing vibes...");
    let all_tracks =
        match discography::aggregate(&client, &artist.id, &artist.name, &mut spinner).await {
            Ok(tracks) => tracks,
            Err(e) => {
                spinner.finish();
                return super::report_failure(&e).await;
            }
        };
    spinner.finish();

    let filtered = filter::filter(&all_tracks, &spec);
    info!(
        "{} of {} tracks match {}",
        filtered.len(),
        all_tracks.len(),
        spec.describe()
    );
    if filtered.is_empty() {
        warning!("No tracks match your filters!");
        return;
    }

    let mut draft = PlaylistDraft::for_artist(&artist, &user.id, &spec, &filtered);
    if let Some(name) = name {
        draft = draft.with_name(name);
    }
    if private {
        draft = draft.private();
    }

    let mut spinner = Spinner::start("Creating playlist...");
    let result = materialize(&client, draft, &mut spinner).await;
    spinner.finish();

    match result {
        Ok(handle) => {
            success!("Playlist '{}' created!", handle.name);
            info!("Open on Spotify: {}", handle.url);
        }
        Err(e) => super::report_failure(&e).await,
    }
}
