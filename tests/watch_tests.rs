//! Integration tests for live query subscriptions.

use std::time::Duration;
use tivarr::db::Store;
use tivarr::models::{AppSettings, AppTheme, Channel, Movie};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(300);

async fn temp_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("tivarr-watch-test-{}.db", uuid::Uuid::new_v4()));

    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open store")
}

fn test_channel(id: i32, name: &str, category_id: &str) -> Channel {
    Channel {
        id,
        name: name.to_string(),
        stream_url: format!("http://cdn.example.com/user/pass/{id}.ts"),
        icon_url: None,
        category_id: category_id.to_string(),
        category_name: String::new(),
        epg_channel_id: None,
        has_archive: false,
        archive_duration: 0,
        is_favorite: false,
    }
}

fn test_movie(id: i32, name: &str) -> Movie {
    Movie {
        id,
        name: name.to_string(),
        stream_url: format!("http://cdn.example.com/movie/user/pass/{id}.mp4"),
        poster_url: None,
        backdrop_url: None,
        category_id: "10".to_string(),
        category_name: "Movies".to_string(),
        rating: 6.0,
        year: None,
        duration: None,
        description: None,
        genre: None,
        director: None,
        cast: None,
        tmdb_id: None,
        trailer_url: None,
        is_favorite: false,
    }
}

#[tokio::test]
async fn watch_emits_the_current_rows_immediately() {
    let store = temp_store().await;
    store
        .upsert_channels(&[test_channel(1, "One", "1")])
        .await
        .unwrap();

    let mut rx = store.watch_channels();

    let initial = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(initial.len(), 1);
    assert_eq!(initial[0].id, 1);
}

#[tokio::test]
async fn watch_re_emits_after_every_write_to_the_table() {
    let store = temp_store().await;
    let mut rx = store.watch_channels();

    let initial = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert!(initial.is_empty());

    store
        .upsert_channels(&[test_channel(1, "One", "1")])
        .await
        .unwrap();
    let after_insert = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(after_insert.len(), 1);

    store.remove_channel(1).await.unwrap();
    let after_delete = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert!(after_delete.is_empty());
}

#[tokio::test]
async fn watch_ignores_writes_to_other_tables() {
    let store = temp_store().await;
    let mut rx = store.watch_channels();
    timeout(WAIT, rx.recv()).await.unwrap().unwrap();

    store.upsert_movies(&[test_movie(1, "Unrelated")]).await.unwrap();

    assert!(
        timeout(QUIET, rx.recv()).await.is_err(),
        "movie writes must not wake a channel watcher"
    );
}

#[tokio::test]
async fn watch_filters_stay_applied_on_re_emission() {
    let store = temp_store().await;
    store
        .upsert_channels(&[
            test_channel(1, "News One", "1"),
            test_channel(2, "Sports One", "2"),
        ])
        .await
        .unwrap();

    let mut rx = store.watch_channels_by_category("1");
    let initial = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(initial.len(), 1);

    store
        .upsert_channels(&[test_channel(3, "News Two", "1")])
        .await
        .unwrap();
    let updated = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    let ids: Vec<i32> = updated.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn watch_terminates_when_the_receiver_is_dropped() {
    let store = temp_store().await;

    let rx = store.watch_channels();
    drop(rx);

    // Writes keep working once the watcher task has wound down.
    for id in 1..=20 {
        store
            .upsert_channels(&[test_channel(id, "Churn", "1")])
            .await
            .unwrap();
    }
    assert_eq!(store.list_channels().await.unwrap().len(), 20);
}

#[tokio::test]
async fn watch_settings_follows_saves() {
    let store = temp_store().await;
    let mut rx = store.watch_settings();

    let initial = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert!(initial.is_none());

    let settings = AppSettings {
        theme: AppTheme::Dark,
        ..AppSettings::default()
    };
    store.save_settings(&settings).await.unwrap();

    let saved = timeout(WAIT, rx.recv()).await.unwrap().unwrap().unwrap();
    assert_eq!(saved.theme, AppTheme::Dark);
}
