//! Integration tests for the catalog store, run against a throwaway
//! SQLite database per test.

use tivarr::clients::xtream::{self, LiveStream, StreamCategory};
use tivarr::db::Store;
use tivarr::models::{
    AppSettings, AppTheme, Category, CategoryKind, Channel, ContentType, EpgProgram, Episode,
    FavoriteItem, Movie, ParentalControl, PlaybackQuality, Season, SubtitleSize, TvSeries,
    UserCredentials, WatchHistoryItem,
};

async fn temp_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("tivarr-store-test-{}.db", uuid::Uuid::new_v4()));

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

fn test_movie(id: i32, name: &str, rating: f64) -> Movie {
    Movie {
        id,
        name: name.to_string(),
        stream_url: format!("http://cdn.example.com/movie/user/pass/{id}.mp4"),
        poster_url: None,
        backdrop_url: None,
        category_id: "10".to_string(),
        category_name: "Movies".to_string(),
        rating,
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

fn test_series(id: i32, name: &str) -> TvSeries {
    TvSeries {
        id,
        name: name.to_string(),
        poster_url: None,
        backdrop_url: None,
        category_id: "20".to_string(),
        category_name: "Drama".to_string(),
        rating: 4.0,
        year: Some("2024".to_string()),
        description: None,
        genre: None,
        director: None,
        cast: None,
        tmdb_id: None,
        trailer_url: None,
        total_seasons: 0,
        total_episodes: 0,
        is_favorite: false,
    }
}

fn test_season(id: i32, series_id: i32, number: i32) -> Season {
    Season {
        id,
        series_id,
        season_number: number,
        name: format!("Season {number}"),
        overview: None,
        poster_url: None,
        episode_count: 2,
        air_date: None,
    }
}

fn test_episode(id: &str, series_id: i32, season: i32, number: i32) -> Episode {
    Episode {
        id: id.to_string(),
        series_id,
        season_number: season,
        episode_number: number,
        title: format!("Episode {number}"),
        stream_url: format!("http://cdn.example.com/series/user/pass/{id}.mkv"),
        overview: None,
        still_url: None,
        duration: None,
        air_date: None,
        rating: 0.0,
        tmdb_id: None,
    }
}

fn test_program(id: &str, channel_id: &str, start: i64, end: i64) -> EpgProgram {
    EpgProgram {
        id: id.to_string(),
        channel_id: channel_id.to_string(),
        title: format!("Programme {id}"),
        description: None,
        start_time: start,
        end_time: end,
        language: None,
    }
}

fn test_history(content_id: &str, watched_at: i64) -> WatchHistoryItem {
    WatchHistoryItem {
        content_id: content_id.to_string(),
        content_type: ContentType::Movie,
        title: format!("Title {content_id}"),
        poster_url: None,
        last_watched_position: 60_000,
        duration: 7_200_000,
        last_watched_at: watched_at,
    }
}

#[tokio::test]
async fn channels_roundtrip_ordered_by_name() {
    let store = temp_store().await;

    store
        .upsert_channels(&[
            test_channel(3, "Cine Max", "1"),
            test_channel(1, "Alpha News", "1"),
            test_channel(2, "Beta Sports", "2"),
        ])
        .await
        .unwrap();

    let all = store.list_channels().await.unwrap();
    let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha News", "Beta Sports", "Cine Max"]);

    let found = store.get_channel(2).await.unwrap().unwrap();
    assert_eq!(found.name, "Beta Sports");
    assert!(store.get_channel(99).await.unwrap().is_none());

    let hits = store.search_channels("news").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 1);
}

#[tokio::test]
async fn synced_category_name_resolves_on_channel_reads() {
    let store = temp_store().await;

    let category = StreamCategory {
        category_id: "1".to_string(),
        category_name: "News".to_string(),
        parent_id: 0,
    };
    let stream = LiveStream {
        num: 1,
        name: "World News HD".to_string(),
        stream_type: "live".to_string(),
        stream_id: 5,
        stream_icon: String::new(),
        epg_channel_id: "world.news".to_string(),
        added: "0".to_string(),
        category_id: "1".to_string(),
        custom_sid: String::new(),
        tv_archive: 1,
        direct_source: String::new(),
        tv_archive_duration: 3,
    };

    let channel = xtream::map_live_stream(
        stream,
        "http://cdn.example.com",
        "user",
        "pass",
        &category.category_name,
    );
    store
        .upsert_categories(&[xtream::map_category(category)], CategoryKind::Live)
        .await
        .unwrap();
    store.upsert_channels(&[channel]).await.unwrap();

    let by_category = store.list_channels_by_category("1").await.unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].id, 5);
    assert_eq!(by_category[0].category_name, "News");
    assert!(by_category[0].has_archive);
}

#[tokio::test]
async fn bulk_upsert_replaces_conflicting_rows() {
    let store = temp_store().await;

    store
        .upsert_channel(&test_channel(5, "Old Name", "1"))
        .await
        .unwrap();
    store.set_channel_favorite(5, true).await.unwrap();
    assert!(store.get_channel(5).await.unwrap().unwrap().is_favorite);

    // A re-sync clobbers the row, favorite flag included.
    store
        .upsert_channels(&[test_channel(5, "New Name", "1")])
        .await
        .unwrap();

    let after = store.get_channel(5).await.unwrap().unwrap();
    assert_eq!(after.name, "New Name");
    assert!(!after.is_favorite);

    let all = store.list_channels().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn update_of_missing_row_is_a_noop() {
    let store = temp_store().await;

    store
        .update_channel(&test_channel(42, "Ghost", "1"))
        .await
        .unwrap();
    assert!(store.list_channels().await.unwrap().is_empty());

    store.update_movie(&test_movie(42, "Ghost", 5.0)).await.unwrap();
    assert!(store.list_movies().await.unwrap().is_empty());
}

#[tokio::test]
async fn recently_watched_channels_come_back_newest_first() {
    let store = temp_store().await;

    store
        .upsert_channels(&[
            test_channel(1, "One", "1"),
            test_channel(2, "Two", "1"),
            test_channel(3, "Three", "1"),
        ])
        .await
        .unwrap();

    store.touch_channel_last_watched(2, 1_000).await.unwrap();
    store.touch_channel_last_watched(3, 3_000).await.unwrap();
    store.touch_channel_last_watched(1, 2_000).await.unwrap();

    let recent = store.recent_channels(None).await.unwrap();
    let ids: Vec<i32> = recent.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);

    let limited = store.recent_channels(Some(2)).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, 3);
}

#[tokio::test]
async fn featured_movies_require_a_high_rating() {
    let store = temp_store().await;

    store
        .upsert_movies(&[
            test_movie(1, "Low", 5.0),
            test_movie(2, "Great", 8.5),
            test_movie(3, "Good", 7.0),
        ])
        .await
        .unwrap();

    let featured = store.featured_movies(None).await.unwrap();
    let ids: Vec<i32> = featured.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![2, 3]);

    let capped = store.featured_movies(Some(1)).await.unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].id, 2);
}

#[tokio::test]
async fn movie_search_and_favorites() {
    let store = temp_store().await;

    store
        .upsert_movies(&[
            test_movie(1, "The Quiet Sea", 6.0),
            test_movie(2, "Loud City", 6.5),
        ])
        .await
        .unwrap();

    let hits = store.search_movies("quiet").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 1);

    store.set_movie_favorite(2, true).await.unwrap();
    let favorites = store.list_favorite_movies().await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, 2);

    assert!(store.remove_movie(1).await.unwrap());
    assert!(!store.remove_movie(1).await.unwrap());
    assert_eq!(store.list_movies().await.unwrap().len(), 1);
}

#[tokio::test]
async fn seasons_and_episodes_come_back_in_broadcast_order() {
    let store = temp_store().await;

    store.upsert_series(&test_series(7, "Border Town")).await.unwrap();
    store
        .upsert_seasons(&[
            test_season(72, 7, 2),
            test_season(71, 7, 1),
        ])
        .await
        .unwrap();
    store
        .upsert_episodes(&[
            test_episode("703", 7, 2, 1),
            test_episode("702", 7, 1, 2),
            test_episode("701", 7, 1, 1),
        ])
        .await
        .unwrap();

    let seasons = store.seasons_for_series(7).await.unwrap();
    let numbers: Vec<i32> = seasons.iter().map(|s| s.season_number).collect();
    assert_eq!(numbers, vec![1, 2]);

    let first_season = store.episodes_for_season(7, 1).await.unwrap();
    let episode_ids: Vec<&str> = first_season.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(episode_ids, vec!["701", "702"]);

    let all = store.episodes_for_series(7).await.unwrap();
    let all_ids: Vec<&str> = all.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(all_ids, vec!["701", "702", "703"]);

    assert_eq!(store.clear_episodes_for_series(7).await.unwrap(), 3);
    assert!(store.episodes_for_series(7).await.unwrap().is_empty());
    assert_eq!(store.clear_seasons_for_series(7).await.unwrap(), 2);
}

#[tokio::test]
async fn epg_window_queries_are_strict() {
    let store = temp_store().await;

    store
        .upsert_epg_programs(&[
            test_program("a", "news.uk", 1_000, 2_000),
            test_program("b", "news.uk", 2_000, 3_000),
            // Straddles the window end, so range reads exclude it.
            test_program("c", "news.uk", 2_500, 4_000),
            test_program("d", "sports.uk", 1_000, 2_000),
        ])
        .await
        .unwrap();

    let window = store.epg_in_range("news.uk", 1_000, 3_000).await.unwrap();
    let ids: Vec<&str> = window.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    let on_now = store.current_epg(2_000).await.unwrap();
    let mut now_ids: Vec<&str> = on_now.iter().map(|p| p.id.as_str()).collect();
    now_ids.sort_unstable();
    assert_eq!(now_ids, vec!["a", "b", "d"]);

    // Strictly-before cutoff: a programme ending exactly at the cutoff stays.
    assert_eq!(store.prune_epg_before(2_000).await.unwrap(), 0);
    assert_eq!(store.prune_epg_before(2_001).await.unwrap(), 2);
    assert_eq!(store.epg_for_channel("news.uk").await.unwrap().len(), 2);
}

#[tokio::test]
async fn history_is_replaced_per_title_and_pruned_by_age() {
    let store = temp_store().await;

    store.upsert_history(&test_history("m1", 1_000)).await.unwrap();
    store.upsert_history(&test_history("m2", 3_000)).await.unwrap();
    store.upsert_history(&test_history("m3", 2_000)).await.unwrap();

    let recent = store.recent_history(None).await.unwrap();
    let ids: Vec<&str> = recent.iter().map(|h| h.content_id.as_str()).collect();
    assert_eq!(ids, vec!["m2", "m3", "m1"]);

    // Rewatching updates the single row for that title.
    let mut rewatch = test_history("m1", 5_000);
    rewatch.last_watched_position = 500_000;
    store.upsert_history(&rewatch).await.unwrap();

    let entry = store.get_history_entry("m1").await.unwrap().unwrap();
    assert_eq!(entry.last_watched_position, 500_000);
    assert_eq!(store.recent_history(None).await.unwrap().len(), 3);

    assert_eq!(store.prune_history_before(3_000).await.unwrap(), 1);
    assert!(store.get_history_entry("m3").await.unwrap().is_none());

    assert!(store.remove_history_entry("m2").await.unwrap());
    assert!(!store.remove_history_entry("m2").await.unwrap());
}

#[tokio::test]
async fn favorites_are_keyed_by_id_and_type() {
    let store = temp_store().await;

    store
        .add_favorite(&FavoriteItem {
            content_id: "5".to_string(),
            content_type: ContentType::LiveTv,
            title: "World News HD".to_string(),
            poster_url: None,
            added_at: 1_000,
        })
        .await
        .unwrap();
    store
        .add_favorite(&FavoriteItem {
            content_id: "5".to_string(),
            content_type: ContentType::Movie,
            title: "The Five".to_string(),
            poster_url: None,
            added_at: 2_000,
        })
        .await
        .unwrap();

    // Re-adding the same id and type replaces the row in place.
    store
        .add_favorite(&FavoriteItem {
            content_id: "5".to_string(),
            content_type: ContentType::LiveTv,
            title: "World News".to_string(),
            poster_url: None,
            added_at: 3_000,
        })
        .await
        .unwrap();

    // Same id under two content types are distinct rows.
    let all = store.list_favorites().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "World News");

    let replaced = store
        .get_favorite("5", ContentType::LiveTv)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.title, "World News");
    assert_eq!(replaced.added_at, 3_000);

    assert!(store.is_favorite("5", ContentType::LiveTv).await.unwrap());
    assert!(!store.is_favorite("5", ContentType::Series).await.unwrap());

    assert!(store.remove_favorite("5", ContentType::LiveTv).await.unwrap());
    assert!(store.is_favorite("5", ContentType::Movie).await.unwrap());
    assert_eq!(store.favorites_by_type(ContentType::Movie).await.unwrap().len(), 1);
}

#[tokio::test]
async fn settings_round_trip_preserves_every_field() {
    let store = temp_store().await;
    assert!(store.get_settings().await.unwrap().is_none());

    let settings = AppSettings {
        theme: AppTheme::Dark,
        playback_quality: PlaybackQuality::High,
        auto_play: false,
        show_subtitles: true,
        subtitle_size: SubtitleSize::Large,
        parental_control: ParentalControl {
            enabled: true,
            pin: Some("1234".to_string()),
            blocked_categories: vec!["18".to_string(), "19".to_string()],
            max_rating: Some("PG-13".to_string()),
        },
        tmdb_api_key: Some("key".to_string()),
    };
    store.save_settings(&settings).await.unwrap();

    let loaded = store.get_settings().await.unwrap().unwrap();
    assert_eq!(loaded, settings);

    // Singleton row: a second save overwrites in place.
    let mut changed = settings;
    changed.theme = AppTheme::Light;
    changed.parental_control.blocked_categories.clear();
    store.save_settings(&changed).await.unwrap();

    let reloaded = store.get_settings().await.unwrap().unwrap();
    assert_eq!(reloaded.theme, AppTheme::Light);
    assert!(reloaded.parental_control.blocked_categories.is_empty());
}

#[tokio::test]
async fn credentials_are_a_singleton() {
    let store = temp_store().await;
    assert!(store.get_credentials().await.unwrap().is_none());

    let creds = UserCredentials {
        server_url: "http://one.example.com".to_string(),
        username: "demo".to_string(),
        password: "secret".to_string(),
        port: "8080".to_string(),
    };
    store.save_credentials(&creds).await.unwrap();
    assert_eq!(store.get_credentials().await.unwrap().unwrap(), creds);

    let replacement = UserCredentials {
        server_url: "http://two.example.com".to_string(),
        ..creds
    };
    store.save_credentials(&replacement).await.unwrap();

    let loaded = store.get_credentials().await.unwrap().unwrap();
    assert_eq!(loaded.server_url, "http://two.example.com");

    store.delete_credentials().await.unwrap();
    assert!(store.get_credentials().await.unwrap().is_none());
}

#[tokio::test]
async fn categories_are_scoped_by_kind() {
    let store = temp_store().await;

    let live = vec![
        Category {
            id: "2".to_string(),
            name: "Sports".to_string(),
            parent_id: 0,
        },
        Category {
            id: "1".to_string(),
            name: "News".to_string(),
            parent_id: 0,
        },
    ];
    let vod = vec![Category {
        id: "1".to_string(),
        name: "Action".to_string(),
        parent_id: 0,
    }];

    store.upsert_categories(&live, CategoryKind::Live).await.unwrap();

    // Same provider id under another kind replaces the row; category ids
    // are globally unique, so a VOD sync that reuses id "1" wins.
    store.upsert_categories(&vod, CategoryKind::Vod).await.unwrap();

    let vod_list = store.list_categories(CategoryKind::Vod).await.unwrap();
    assert_eq!(vod_list.len(), 1);
    assert_eq!(vod_list[0].name, "Action");

    let live_list = store.list_categories(CategoryKind::Live).await.unwrap();
    assert_eq!(live_list.len(), 1);
    assert_eq!(live_list[0].name, "Sports");

    assert_eq!(store.clear_categories(CategoryKind::Live).await.unwrap(), 1);
    assert!(store.list_categories(CategoryKind::Live).await.unwrap().is_empty());
    assert_eq!(store.list_categories(CategoryKind::Vod).await.unwrap().len(), 1);
}

#[tokio::test]
async fn reset_recreates_an_empty_schema() {
    let store = temp_store().await;

    store
        .upsert_channels(&[test_channel(1, "One", "1")])
        .await
        .unwrap();
    store.upsert_history(&test_history("m1", 1_000)).await.unwrap();

    store.reset().await.unwrap();

    assert!(store.list_channels().await.unwrap().is_empty());
    assert!(store.recent_history(None).await.unwrap().is_empty());

    // The schema is usable again after the wipe.
    store
        .upsert_channels(&[test_channel(2, "Two", "1")])
        .await
        .unwrap();
    assert_eq!(store.list_channels().await.unwrap().len(), 1);
}
