use crate::{
    discography, filter, info, progress::Spinner, success, types::FilterSpec, warning,
};

pub async fn tracks(artist_query: String, spec: FilterSpec, limit: Option<usize>) {
    let client = super::connect().await;

    let artist = match super::resolve_artist(&client, &artist_query).await {
        Ok(Some(artist)) => artist,
        Ok(None) => {
            warning!("Artist not found!");
            return;
        }
        Err(e) => return super::report_failure(&e).await,
    };

    info!(
        "{} • {} followers • {}% popularity",
        artist.name, artist.followers, artist.popularity
    );

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
    success!("Analysis complete: {} unique tracks", all_tracks.len());

    let filtered = filter::filter(&all_tracks, &spec);
    info!("Filters: {}", spec.describe());
    info!("Playlist preview ({} tracks)", filtered.len());
    if filtered.is_empty() {
        warning!("No tracks match your filters!");
        return;
    }

    super::print_tracks(&filtered, limit);
}
