mod common;

use common::*;
use vibemix::{
    management::Session,
    progress::Silent,
    types::{Bounds, FilterSpec},
};

fn two_artist_catalog() -> FakeCatalog {
    FakeCatalog::new()
        .with_release(
            "a",
            release("ra", "Alpha", Some("2001-01-01")),
            vec![track("a1", "Loud", &["a"]), track("a2", "Quiet", &["a"])],
        )
        .with_release(
            "b",
            release("rb", "Beta", Some("2002-01-01")),
            vec![track("b1", "Other", &["b"])],
        )
        .with_features("a1", 0.9, 0.5)
        .with_features("a2", 0.1, 0.5)
}

#[tokio::test]
async fn test_no_artist_selected() {
    let catalog = two_artist_catalog();
    let mut session = Session::new();

    let tracks = session.load_tracks(&catalog, &mut Silent).await.unwrap();

    assert!(tracks.is_none());
    assert!(session.filtered_tracks().is_empty());
    assert!(catalog.calls().release_pages.is_empty());
}

#[tokio::test]
async fn test_filter_changes_reuse_cache() {
    let catalog = two_artist_catalog();
    let mut session = Session::new();
    session.select_artist(artist("a", "Alpha Artist"));

    let count = session
        .load_tracks(&catalog, &mut Silent)
        .await
        .unwrap()
        .map(|t| t.len());
    assert_eq!(count, Some(2));

    session.filter.energy = Bounds::new(0.5, 1.0);
    let filtered = session.filtered_tracks();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "a1");

    session.load_tracks(&catalog, &mut Silent).await.unwrap();
    assert_eq!(catalog.calls().release_pages, vec!["a"]);
}

#[tokio::test]
async fn test_artist_change_invalidates_cache() {
    let catalog = two_artist_catalog();
    let mut session = Session::new();

    session.select_artist(artist("a", "Alpha Artist"));
    session.load_tracks(&catalog, &mut Silent).await.unwrap();

    session.select_artist(artist("b", "Beta Artist"));
    assert!(session.cached_tracks().is_none());
    assert!(session.filtered_tracks().is_empty());

    let tracks = session
        .load_tracks(&catalog, &mut Silent)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id, "b1");
    assert_eq!(catalog.calls().release_pages, vec!["a", "b"]);
}

#[tokio::test]
async fn test_failed_load_keeps_state() {
    let catalog = two_artist_catalog();
    let mut session = Session::new();
    session.filter.deep_cuts = true;

    session.select_artist(artist("a", "Alpha Artist"));
    session.load_tracks(&catalog, &mut Silent).await.unwrap();

    catalog.set_fail_releases(true);
    session.select_artist(artist("b", "Beta Artist"));
    assert!(session.load_tracks(&catalog, &mut Silent).await.is_err());

    assert_eq!(session.artist().map(|a| a.id.as_str()), Some("b"));
    assert!(session.cached_tracks().is_none());
    assert!(session.filter.deep_cuts);

    // Going back to the previous artist is served from the cache
    session.select_artist(artist("a", "Alpha Artist"));
    assert_eq!(session.cached_tracks().map(|t| t.len()), Some(2));

    // Retrying after recovery succeeds
    catalog.set_fail_releases(false);
    session.select_artist(artist("b", "Beta Artist"));
    assert!(session.load_tracks(&catalog, &mut Silent).await.is_ok());
    assert_eq!(session.cached_tracks().map(|t| t.len()), Some(1));
}

#[tokio::test]
async fn test_home_clears_selection() {
    let catalog = two_artist_catalog();
    let mut session = Session::new();
    session.select_artist(artist("a", "Alpha Artist"));
    session.load_tracks(&catalog, &mut Silent).await.unwrap();

    session.clear_artist();
    assert!(session.artist().is_none());
    assert!(session.filtered_tracks().is_empty());
    assert_eq!(session.filter, FilterSpec::default());
}
