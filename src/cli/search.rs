use tabled::Table;

use crate::{
    info,
    spotify::Catalog,
    types::{ArtistRef, ArtistTableRow},
    warning,
};

pub async fn search(query: String, limit: u32) {
    let client = super::connect().await;

    match client.search_artists(&query, limit).await {
        Ok(artists) if artists.is_empty() => warning!("Artist not found!"),
        Ok(artists) => {
            info!("{} result(s) for '{}'", artists.len(), query);
            print_artists(&artists);
        }
        Err(e) => super::report_failure(&e).await,
    }
}

pub(super) fn print_artists(artists: &[ArtistRef]) {
    let rows: Vec<ArtistTableRow> = artists
        .iter()
        .map(|a| ArtistTableRow {
            name: a.name.clone(),
            followers: a.followers,
            popularity: a.popularity,
            id: a.id.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));
}
