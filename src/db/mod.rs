use crate::models::{
    AppSettings, Category, CategoryKind, Channel, ContentType, EpgProgram, Episode, FavoriteItem,
    Movie, Season, TvSeries, UserCredentials, WatchHistoryItem,
};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub mod migrator;
pub mod repositories;
pub mod watch;

pub use watch::Table;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    changes: watch::ChangeBus,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self {
            conn,
            changes: watch::ChangeBus::default(),
        })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// Drops every table and recreates the schema from scratch.
    pub async fn reset(&self) -> Result<()> {
        use sea_orm_migration::MigratorTrait;
        migrator::Migrator::fresh(&self.conn).await?;
        info!("Database reset to a clean schema");
        for table in Table::ALL {
            self.changes.publish(table);
        }
        Ok(())
    }

    fn channel_repo(&self) -> repositories::channel::ChannelRepository {
        repositories::channel::ChannelRepository::new(self.conn.clone())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn series_repo(&self) -> repositories::series::SeriesRepository {
        repositories::series::SeriesRepository::new(self.conn.clone())
    }

    fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    fn favorite_repo(&self) -> repositories::favorite::FavoriteRepository {
        repositories::favorite::FavoriteRepository::new(self.conn.clone())
    }

    fn history_repo(&self) -> repositories::history::HistoryRepository {
        repositories::history::HistoryRepository::new(self.conn.clone())
    }

    fn epg_repo(&self) -> repositories::epg::EpgRepository {
        repositories::epg::EpgRepository::new(self.conn.clone())
    }

    fn settings_repo(&self) -> repositories::settings::SettingsRepository {
        repositories::settings::SettingsRepository::new(self.conn.clone())
    }

    // ========== Channels ==========

    pub async fn list_channels(&self) -> Result<Vec<Channel>> {
        self.channel_repo().list_all().await
    }

    pub async fn list_channels_by_category(&self, category_id: &str) -> Result<Vec<Channel>> {
        self.channel_repo().list_by_category(category_id).await
    }

    pub async fn list_favorite_channels(&self) -> Result<Vec<Channel>> {
        self.channel_repo().list_favorites().await
    }

    pub async fn search_channels(&self, query: &str) -> Result<Vec<Channel>> {
        self.channel_repo().search(query).await
    }

    pub async fn get_channel(&self, id: i32) -> Result<Option<Channel>> {
        self.channel_repo().get(id).await
    }

    pub async fn recent_channels(&self, limit: Option<u64>) -> Result<Vec<Channel>> {
        self.channel_repo().list_recent(limit).await
    }

    pub async fn upsert_channels(&self, channels: &[Channel]) -> Result<()> {
        self.channel_repo().upsert_many(channels).await?;
        self.changes.publish(Table::Channels);
        Ok(())
    }

    pub async fn upsert_channel(&self, channel: &Channel) -> Result<()> {
        self.channel_repo().upsert(channel).await?;
        self.changes.publish(Table::Channels);
        Ok(())
    }

    pub async fn update_channel(&self, channel: &Channel) -> Result<()> {
        self.channel_repo().update(channel).await?;
        self.changes.publish(Table::Channels);
        Ok(())
    }

    pub async fn set_channel_favorite(&self, id: i32, is_favorite: bool) -> Result<()> {
        self.channel_repo().set_favorite(id, is_favorite).await?;
        self.changes.publish(Table::Channels);
        Ok(())
    }

    pub async fn touch_channel_last_watched(&self, id: i32, timestamp: i64) -> Result<()> {
        self.channel_repo().touch_last_watched(id, timestamp).await?;
        self.changes.publish(Table::Channels);
        Ok(())
    }

    pub async fn remove_channel(&self, id: i32) -> Result<bool> {
        let removed = self.channel_repo().delete(id).await?;
        self.changes.publish(Table::Channels);
        Ok(removed)
    }

    pub async fn clear_channels(&self) -> Result<u64> {
        let count = self.channel_repo().clear().await?;
        self.changes.publish(Table::Channels);
        Ok(count)
    }

    // ========== Movies ==========

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.movie_repo().list_all().await
    }

    pub async fn list_movies_by_category(&self, category_id: &str) -> Result<Vec<Movie>> {
        self.movie_repo().list_by_category(category_id).await
    }

    pub async fn list_favorite_movies(&self) -> Result<Vec<Movie>> {
        self.movie_repo().list_favorites().await
    }

    pub async fn search_movies(&self, query: &str) -> Result<Vec<Movie>> {
        self.movie_repo().search(query).await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn recent_movies(&self, limit: Option<u64>) -> Result<Vec<Movie>> {
        self.movie_repo().list_recent(limit).await
    }

    pub async fn featured_movies(&self, limit: Option<u64>) -> Result<Vec<Movie>> {
        self.movie_repo().list_featured(limit).await
    }

    pub async fn upsert_movies(&self, movies: &[Movie]) -> Result<()> {
        self.movie_repo().upsert_many(movies).await?;
        self.changes.publish(Table::Movies);
        Ok(())
    }

    pub async fn upsert_movie(&self, movie: &Movie) -> Result<()> {
        self.movie_repo().upsert(movie).await?;
        self.changes.publish(Table::Movies);
        Ok(())
    }

    pub async fn update_movie(&self, movie: &Movie) -> Result<()> {
        self.movie_repo().update(movie).await?;
        self.changes.publish(Table::Movies);
        Ok(())
    }

    pub async fn set_movie_favorite(&self, id: i32, is_favorite: bool) -> Result<()> {
        self.movie_repo().set_favorite(id, is_favorite).await?;
        self.changes.publish(Table::Movies);
        Ok(())
    }

    pub async fn touch_movie_last_watched(&self, id: i32, timestamp: i64) -> Result<()> {
        self.movie_repo().touch_last_watched(id, timestamp).await?;
        self.changes.publish(Table::Movies);
        Ok(())
    }

    pub async fn remove_movie(&self, id: i32) -> Result<bool> {
        let removed = self.movie_repo().delete(id).await?;
        self.changes.publish(Table::Movies);
        Ok(removed)
    }

    pub async fn clear_movies(&self) -> Result<u64> {
        let count = self.movie_repo().clear().await?;
        self.changes.publish(Table::Movies);
        Ok(count)
    }

    // ========== Series, seasons & episodes ==========

    pub async fn list_series(&self) -> Result<Vec<TvSeries>> {
        self.series_repo().list_all().await
    }

    pub async fn list_series_by_category(&self, category_id: &str) -> Result<Vec<TvSeries>> {
        self.series_repo().list_by_category(category_id).await
    }

    pub async fn list_favorite_series(&self) -> Result<Vec<TvSeries>> {
        self.series_repo().list_favorites().await
    }

    pub async fn search_series(&self, query: &str) -> Result<Vec<TvSeries>> {
        self.series_repo().search(query).await
    }

    pub async fn get_series(&self, id: i32) -> Result<Option<TvSeries>> {
        self.series_repo().get(id).await
    }

    pub async fn recent_series(&self, limit: Option<u64>) -> Result<Vec<TvSeries>> {
        self.series_repo().list_recent(limit).await
    }

    pub async fn upsert_series_batch(&self, series: &[TvSeries]) -> Result<()> {
        self.series_repo().upsert_many(series).await?;
        self.changes.publish(Table::TvSeries);
        Ok(())
    }

    pub async fn upsert_series(&self, series: &TvSeries) -> Result<()> {
        self.series_repo().upsert(series).await?;
        self.changes.publish(Table::TvSeries);
        Ok(())
    }

    pub async fn update_series(&self, series: &TvSeries) -> Result<()> {
        self.series_repo().update(series).await?;
        self.changes.publish(Table::TvSeries);
        Ok(())
    }

    pub async fn set_series_favorite(&self, id: i32, is_favorite: bool) -> Result<()> {
        self.series_repo().set_favorite(id, is_favorite).await?;
        self.changes.publish(Table::TvSeries);
        Ok(())
    }

    pub async fn touch_series_last_watched(&self, id: i32, timestamp: i64) -> Result<()> {
        self.series_repo().touch_last_watched(id, timestamp).await?;
        self.changes.publish(Table::TvSeries);
        Ok(())
    }

    pub async fn remove_series(&self, id: i32) -> Result<bool> {
        let removed = self.series_repo().delete(id).await?;
        self.changes.publish(Table::TvSeries);
        Ok(removed)
    }

    pub async fn clear_series(&self) -> Result<u64> {
        let count = self.series_repo().clear().await?;
        self.changes.publish(Table::TvSeries);
        Ok(count)
    }

    pub async fn seasons_for_series(&self, series_id: i32) -> Result<Vec<Season>> {
        self.series_repo().seasons_for_series(series_id).await
    }

    pub async fn get_season(&self, id: i32) -> Result<Option<Season>> {
        self.series_repo().get_season(id).await
    }

    pub async fn upsert_seasons(&self, seasons: &[Season]) -> Result<()> {
        self.series_repo().upsert_seasons(seasons).await?;
        self.changes.publish(Table::Seasons);
        Ok(())
    }

    pub async fn upsert_season(&self, season: &Season) -> Result<()> {
        self.series_repo().upsert_season(season).await?;
        self.changes.publish(Table::Seasons);
        Ok(())
    }

    pub async fn update_season(&self, season: &Season) -> Result<()> {
        self.series_repo().update_season(season).await?;
        self.changes.publish(Table::Seasons);
        Ok(())
    }

    pub async fn remove_season(&self, id: i32) -> Result<bool> {
        let removed = self.series_repo().delete_season(id).await?;
        self.changes.publish(Table::Seasons);
        Ok(removed)
    }

    pub async fn clear_seasons_for_series(&self, series_id: i32) -> Result<u64> {
        let count = self
            .series_repo()
            .delete_seasons_for_series(series_id)
            .await?;
        self.changes.publish(Table::Seasons);
        Ok(count)
    }

    pub async fn episodes_for_season(
        &self,
        series_id: i32,
        season_number: i32,
    ) -> Result<Vec<Episode>> {
        self.series_repo()
            .episodes_for_season(series_id, season_number)
            .await
    }

    pub async fn episodes_for_series(&self, series_id: i32) -> Result<Vec<Episode>> {
        self.series_repo().episodes_for_series(series_id).await
    }

    pub async fn get_episode(&self, id: &str) -> Result<Option<Episode>> {
        self.series_repo().get_episode(id).await
    }

    pub async fn upsert_episodes(&self, episodes: &[Episode]) -> Result<()> {
        self.series_repo().upsert_episodes(episodes).await?;
        self.changes.publish(Table::Episodes);
        Ok(())
    }

    pub async fn upsert_episode(&self, episode: &Episode) -> Result<()> {
        self.series_repo().upsert_episode(episode).await?;
        self.changes.publish(Table::Episodes);
        Ok(())
    }

    pub async fn update_episode(&self, episode: &Episode) -> Result<()> {
        self.series_repo().update_episode(episode).await?;
        self.changes.publish(Table::Episodes);
        Ok(())
    }

    pub async fn remove_episode(&self, id: &str) -> Result<bool> {
        let removed = self.series_repo().delete_episode(id).await?;
        self.changes.publish(Table::Episodes);
        Ok(removed)
    }

    pub async fn clear_episodes_for_series(&self, series_id: i32) -> Result<u64> {
        let count = self
            .series_repo()
            .delete_episodes_for_series(series_id)
            .await?;
        self.changes.publish(Table::Episodes);
        Ok(count)
    }

    // ========== Categories ==========

    pub async fn list_categories(&self, kind: CategoryKind) -> Result<Vec<Category>> {
        self.category_repo().list_by_kind(kind).await
    }

    pub async fn list_all_categories(&self) -> Result<Vec<Category>> {
        self.category_repo().list_all().await
    }

    pub async fn get_category(&self, id: &str) -> Result<Option<Category>> {
        self.category_repo().get(id).await
    }

    pub async fn upsert_categories(
        &self,
        categories: &[Category],
        kind: CategoryKind,
    ) -> Result<()> {
        self.category_repo().upsert_many(categories, kind).await?;
        self.changes.publish(Table::Categories);
        Ok(())
    }

    pub async fn upsert_category(&self, category: &Category, kind: CategoryKind) -> Result<()> {
        self.category_repo().upsert(category, kind).await?;
        self.changes.publish(Table::Categories);
        Ok(())
    }

    pub async fn update_category(&self, category: &Category, kind: CategoryKind) -> Result<()> {
        self.category_repo().update(category, kind).await?;
        self.changes.publish(Table::Categories);
        Ok(())
    }

    pub async fn remove_category(&self, id: &str) -> Result<bool> {
        let removed = self.category_repo().delete(id).await?;
        self.changes.publish(Table::Categories);
        Ok(removed)
    }

    pub async fn clear_categories(&self, kind: CategoryKind) -> Result<u64> {
        let count = self.category_repo().delete_by_kind(kind).await?;
        self.changes.publish(Table::Categories);
        Ok(count)
    }

    // ========== Favorites ==========

    pub async fn list_favorites(&self) -> Result<Vec<FavoriteItem>> {
        self.favorite_repo().list_all().await
    }

    pub async fn favorites_by_type(&self, content_type: ContentType) -> Result<Vec<FavoriteItem>> {
        self.favorite_repo().list_by_type(content_type).await
    }

    pub async fn get_favorite(
        &self,
        content_id: &str,
        content_type: ContentType,
    ) -> Result<Option<FavoriteItem>> {
        self.favorite_repo().get(content_id, content_type).await
    }

    pub async fn is_favorite(&self, content_id: &str, content_type: ContentType) -> Result<bool> {
        self.favorite_repo()
            .is_favorite(content_id, content_type)
            .await
    }

    pub async fn add_favorite(&self, item: &FavoriteItem) -> Result<()> {
        self.favorite_repo().upsert(item).await?;
        self.changes.publish(Table::Favorites);
        Ok(())
    }

    pub async fn remove_favorite(
        &self,
        content_id: &str,
        content_type: ContentType,
    ) -> Result<bool> {
        let removed = self.favorite_repo().delete(content_id, content_type).await?;
        self.changes.publish(Table::Favorites);
        Ok(removed)
    }

    pub async fn clear_favorites(&self) -> Result<u64> {
        let count = self.favorite_repo().clear().await?;
        self.changes.publish(Table::Favorites);
        Ok(count)
    }

    // ========== Watch history ==========

    pub async fn recent_history(&self, limit: Option<u64>) -> Result<Vec<WatchHistoryItem>> {
        self.history_repo().list_recent(limit).await
    }

    pub async fn history_by_type(
        &self,
        content_type: ContentType,
    ) -> Result<Vec<WatchHistoryItem>> {
        self.history_repo().list_by_type(content_type).await
    }

    pub async fn get_history_entry(&self, content_id: &str) -> Result<Option<WatchHistoryItem>> {
        self.history_repo().get(content_id).await
    }

    pub async fn upsert_history(&self, item: &WatchHistoryItem) -> Result<()> {
        self.history_repo().upsert(item).await?;
        self.changes.publish(Table::WatchHistory);
        Ok(())
    }

    pub async fn update_history(&self, item: &WatchHistoryItem) -> Result<()> {
        self.history_repo().update(item).await?;
        self.changes.publish(Table::WatchHistory);
        Ok(())
    }

    pub async fn remove_history_entry(&self, content_id: &str) -> Result<bool> {
        let removed = self.history_repo().delete(content_id).await?;
        self.changes.publish(Table::WatchHistory);
        Ok(removed)
    }

    pub async fn prune_history_before(&self, cutoff: i64) -> Result<u64> {
        let count = self.history_repo().prune_before(cutoff).await?;
        self.changes.publish(Table::WatchHistory);
        Ok(count)
    }

    pub async fn clear_history(&self) -> Result<u64> {
        let count = self.history_repo().clear().await?;
        self.changes.publish(Table::WatchHistory);
        Ok(count)
    }

    // ========== EPG ==========

    pub async fn epg_in_range(
        &self,
        channel_id: &str,
        from: i64,
        to: i64,
    ) -> Result<Vec<EpgProgram>> {
        self.epg_repo().programs_in_range(channel_id, from, to).await
    }

    pub async fn epg_for_channel(&self, channel_id: &str) -> Result<Vec<EpgProgram>> {
        self.epg_repo().programs_for_channel(channel_id).await
    }

    pub async fn current_epg(&self, at: i64) -> Result<Vec<EpgProgram>> {
        self.epg_repo().current_programs(at).await
    }

    pub async fn get_epg_program(&self, id: &str) -> Result<Option<EpgProgram>> {
        self.epg_repo().get(id).await
    }

    pub async fn upsert_epg_programs(&self, programs: &[EpgProgram]) -> Result<()> {
        self.epg_repo().upsert_many(programs).await?;
        self.changes.publish(Table::EpgPrograms);
        Ok(())
    }

    pub async fn upsert_epg_program(&self, program: &EpgProgram) -> Result<()> {
        self.epg_repo().upsert(program).await?;
        self.changes.publish(Table::EpgPrograms);
        Ok(())
    }

    pub async fn update_epg_program(&self, program: &EpgProgram) -> Result<()> {
        self.epg_repo().update(program).await?;
        self.changes.publish(Table::EpgPrograms);
        Ok(())
    }

    pub async fn remove_epg_program(&self, id: &str) -> Result<bool> {
        let removed = self.epg_repo().delete(id).await?;
        self.changes.publish(Table::EpgPrograms);
        Ok(removed)
    }

    pub async fn clear_epg_for_channel(&self, channel_id: &str) -> Result<u64> {
        let count = self.epg_repo().delete_for_channel(channel_id).await?;
        self.changes.publish(Table::EpgPrograms);
        Ok(count)
    }

    pub async fn prune_epg_before(&self, cutoff: i64) -> Result<u64> {
        let count = self.epg_repo().prune_before(cutoff).await?;
        self.changes.publish(Table::EpgPrograms);
        Ok(count)
    }

    pub async fn clear_epg(&self) -> Result<u64> {
        let count = self.epg_repo().clear().await?;
        self.changes.publish(Table::EpgPrograms);
        Ok(count)
    }

    // ========== Settings & credentials ==========

    pub async fn get_settings(&self) -> Result<Option<AppSettings>> {
        self.settings_repo().get_settings().await
    }

    pub async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.settings_repo().save_settings(settings).await?;
        self.changes.publish(Table::UserSettings);
        Ok(())
    }

    pub async fn get_credentials(&self) -> Result<Option<UserCredentials>> {
        self.settings_repo().get_credentials().await
    }

    pub async fn save_credentials(&self, credentials: &UserCredentials) -> Result<()> {
        self.settings_repo().save_credentials(credentials).await?;
        self.changes.publish(Table::UserCredentials);
        Ok(())
    }

    pub async fn delete_credentials(&self) -> Result<()> {
        self.settings_repo().delete_credentials().await?;
        self.changes.publish(Table::UserCredentials);
        Ok(())
    }

    // ========== Live queries ==========

    /// Runs `query` once up front and again after every write to `table`,
    /// pushing each result into the returned channel. The spawned task stops
    /// when the receiver is dropped.
    pub fn watch<T, F, Fut>(&self, table: Table, query: F) -> mpsc::Receiver<T>
    where
        T: Send + 'static,
        F: Fn(Self) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send,
    {
        let (tx, rx) = mpsc::channel(16);
        let store = self.clone();
        let mut events = self.changes.subscribe();

        tokio::spawn(async move {
            if !emit(&store, &query, &tx).await {
                return;
            }
            loop {
                match events.recv().await {
                    Ok(changed) if changed == table => {
                        if !emit(&store, &query, &tx).await {
                            break;
                        }
                    }
                    Ok(_) => {}
                    // Missed events collapse into a single refresh.
                    Err(RecvError::Lagged(_)) => {
                        if !emit(&store, &query, &tx).await {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        rx
    }

    pub fn watch_channels(&self) -> mpsc::Receiver<Vec<Channel>> {
        self.watch(Table::Channels, |store| async move {
            store.list_channels().await
        })
    }

    pub fn watch_channels_by_category(
        &self,
        category_id: impl Into<String>,
    ) -> mpsc::Receiver<Vec<Channel>> {
        let category_id = category_id.into();
        self.watch(Table::Channels, move |store| {
            let category_id = category_id.clone();
            async move { store.list_channels_by_category(&category_id).await }
        })
    }

    pub fn watch_favorite_channels(&self) -> mpsc::Receiver<Vec<Channel>> {
        self.watch(Table::Channels, |store| async move {
            store.list_favorite_channels().await
        })
    }

    pub fn watch_movies(&self) -> mpsc::Receiver<Vec<Movie>> {
        self.watch(Table::Movies, |store| async move {
            store.list_movies().await
        })
    }

    pub fn watch_featured_movies(&self) -> mpsc::Receiver<Vec<Movie>> {
        self.watch(Table::Movies, |store| async move {
            store.featured_movies(None).await
        })
    }

    pub fn watch_series(&self) -> mpsc::Receiver<Vec<TvSeries>> {
        self.watch(Table::TvSeries, |store| async move {
            store.list_series().await
        })
    }

    pub fn watch_favorites(&self) -> mpsc::Receiver<Vec<FavoriteItem>> {
        self.watch(Table::Favorites, |store| async move {
            store.list_favorites().await
        })
    }

    pub fn watch_recent_history(&self) -> mpsc::Receiver<Vec<WatchHistoryItem>> {
        self.watch(Table::WatchHistory, |store| async move {
            store.recent_history(None).await
        })
    }

    pub fn watch_epg_for_channel(
        &self,
        channel_id: impl Into<String>,
    ) -> mpsc::Receiver<Vec<EpgProgram>> {
        let channel_id = channel_id.into();
        self.watch(Table::EpgPrograms, move |store| {
            let channel_id = channel_id.clone();
            async move { store.epg_for_channel(&channel_id).await }
        })
    }

    pub fn watch_settings(&self) -> mpsc::Receiver<Option<AppSettings>> {
        self.watch(Table::UserSettings, |store| async move {
            store.get_settings().await
        })
    }
}

/// Runs one watch query and forwards the result. Returns false once the
/// receiver is gone; query failures are logged and the watcher stays alive.
async fn emit<T, F, Fut>(store: &Store, query: &F, tx: &mpsc::Sender<T>) -> bool
where
    F: Fn(Store) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match query(store.clone()).await {
        Ok(value) => tx.send(value).await.is_ok(),
        Err(e) => {
            warn!("Watch query failed: {:#}", e);
            true
        }
    }
}
