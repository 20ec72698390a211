//! Catalog synchronization between the provider, TMDB and the local store.
//!
//! Each sync replaces one section of the catalog: categories for that
//! section are deleted and re-inserted, streams are bulk upserted with
//! replace semantics. The steps are separate writes, so a crash mid-sync
//! can leave tables from different sync generations; the next sync
//! corrects that.

use crate::clients::tmdb::{self, TmdbClient};
use crate::clients::xtream::{self, StreamCategory, XtreamClient};
use crate::config::SyncConfig;
use crate::db::Store;
use crate::models::{Category, CategoryKind, Channel, EpgProgram, Episode, Movie, Season, TvSeries};
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Errors surfaced by catalog synchronization.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for SyncError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Row counts from a full catalog sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub channels: usize,
    pub movies: usize,
    pub series: usize,
}

pub struct SyncService {
    store: Store,
    provider: XtreamClient,
    tmdb: Option<TmdbClient>,
    retention: SyncConfig,
}

impl SyncService {
    #[must_use]
    pub fn new(store: Store, provider: XtreamClient) -> Self {
        Self {
            store,
            provider,
            tmdb: None,
            retention: SyncConfig::default(),
        }
    }

    #[must_use]
    pub fn with_tmdb(mut self, tmdb: TmdbClient) -> Self {
        self.tmdb = Some(tmdb);
        self
    }

    #[must_use]
    pub fn with_retention(mut self, retention: SyncConfig) -> Self {
        self.retention = retention;
        self
    }

    /// Replaces live categories and channels with the provider's catalog.
    pub async fn sync_live(&self) -> Result<usize, SyncError> {
        let categories = self
            .provider
            .live_categories()
            .await
            .map_err(|e| SyncError::Provider(e.to_string()))?;
        let streams = self
            .provider
            .live_streams(None)
            .await
            .map_err(|e| SyncError::Provider(e.to_string()))?;

        let names = category_name_index(&categories);
        let mapped: Vec<Category> = categories.into_iter().map(xtream::map_category).collect();

        self.store
            .clear_categories(CategoryKind::Live)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;
        self.store
            .upsert_categories(&mapped, CategoryKind::Live)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        let channels: Vec<Channel> = streams
            .into_iter()
            .map(|stream| {
                let category_name = names.get(&stream.category_id).cloned().unwrap_or_default();
                xtream::map_live_stream(
                    stream,
                    self.provider.server_url(),
                    self.provider.username(),
                    self.provider.password(),
                    &category_name,
                )
            })
            .collect();

        self.store
            .upsert_channels(&channels)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        info!(
            "Live sync complete: {} channels, {} categories",
            channels.len(),
            mapped.len()
        );
        Ok(channels.len())
    }

    /// Replaces VOD categories and movies with the provider's catalog.
    pub async fn sync_vod(&self) -> Result<usize, SyncError> {
        let categories = self
            .provider
            .vod_categories()
            .await
            .map_err(|e| SyncError::Provider(e.to_string()))?;
        let streams = self
            .provider
            .vod_streams(None)
            .await
            .map_err(|e| SyncError::Provider(e.to_string()))?;

        let names = category_name_index(&categories);
        let mapped: Vec<Category> = categories.into_iter().map(xtream::map_category).collect();

        self.store
            .clear_categories(CategoryKind::Vod)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;
        self.store
            .upsert_categories(&mapped, CategoryKind::Vod)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        let movies: Vec<Movie> = streams
            .into_iter()
            .map(|stream| {
                let category_name = names.get(&stream.category_id).cloned().unwrap_or_default();
                xtream::map_vod_stream(
                    stream,
                    self.provider.server_url(),
                    self.provider.username(),
                    self.provider.password(),
                    &category_name,
                )
            })
            .collect();

        self.store
            .upsert_movies(&movies)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        info!(
            "VOD sync complete: {} movies, {} categories",
            movies.len(),
            mapped.len()
        );
        Ok(movies.len())
    }

    /// Replaces series categories and series listings with the provider's
    /// catalog. Seasons and episodes are fetched per series on demand via
    /// [`Self::sync_series_detail`].
    pub async fn sync_series(&self) -> Result<usize, SyncError> {
        let categories = self
            .provider
            .series_categories()
            .await
            .map_err(|e| SyncError::Provider(e.to_string()))?;
        let listings = self
            .provider
            .series(None)
            .await
            .map_err(|e| SyncError::Provider(e.to_string()))?;

        let names = category_name_index(&categories);
        let mapped: Vec<Category> = categories.into_iter().map(xtream::map_category).collect();

        self.store
            .clear_categories(CategoryKind::Series)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;
        self.store
            .upsert_categories(&mapped, CategoryKind::Series)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        let series: Vec<TvSeries> = listings
            .into_iter()
            .map(|listing| {
                let category_name = names.get(&listing.category_id).cloned().unwrap_or_default();
                xtream::map_series(listing, &category_name)
            })
            .collect();

        self.store
            .upsert_series_batch(&series)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        info!(
            "Series sync complete: {} series, {} categories",
            series.len(),
            mapped.len()
        );
        Ok(series.len())
    }

    /// Runs the three section syncs back to back.
    pub async fn sync_all(&self) -> Result<SyncSummary, SyncError> {
        let channels = self.sync_live().await?;
        let movies = self.sync_vod().await?;
        let series = self.sync_series().await?;
        info!(
            "Full catalog sync complete: {} channels, {} movies, {} series",
            channels, movies, series
        );
        Ok(SyncSummary {
            channels,
            movies,
            series,
        })
    }

    /// Fetches the detail payload for one series and stores the refreshed
    /// row plus its seasons and episodes. The detail payload carries no id
    /// of its own, so the requested id is written back onto the row; the
    /// category name is carried over from the stored listing when present.
    pub async fn sync_series_detail(&self, series_id: i32) -> Result<(), SyncError> {
        let info = self
            .provider
            .series_info(series_id)
            .await
            .map_err(|e| SyncError::Provider(e.to_string()))?;

        let category_name = self
            .store
            .get_series(series_id)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?
            .map(|existing| existing.category_name)
            .unwrap_or_default();

        let season_dtos = info.seasons.clone();
        let episode_buckets = info.episodes.clone();

        let mut series = xtream::map_series_info(info, &category_name);
        series.id = series_id;
        self.store
            .upsert_series(&series)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        let seasons: Vec<Season> = season_dtos
            .into_iter()
            .map(|season| xtream::map_season(season, series_id))
            .collect();
        self.store
            .upsert_seasons(&seasons)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        let episodes: Vec<Episode> = episode_buckets
            .into_values()
            .flatten()
            .map(|episode| {
                xtream::map_episode(
                    episode,
                    self.provider.server_url(),
                    self.provider.username(),
                    self.provider.password(),
                    series_id,
                )
            })
            .collect();
        self.store
            .upsert_episodes(&episodes)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        info!(
            "Series {} detail stored: {} seasons, {} episodes",
            series_id,
            seasons.len(),
            episodes.len()
        );
        Ok(())
    }

    /// Fetches the short programme guide for one stream and stores it.
    pub async fn sync_short_epg(
        &self,
        stream_id: i32,
        limit: Option<u32>,
    ) -> Result<usize, SyncError> {
        let mut buckets = self
            .provider
            .short_epg(stream_id, limit)
            .await
            .map_err(|e| SyncError::Provider(e.to_string()))?;

        let programs: Vec<EpgProgram> = buckets
            .remove("epg_listings")
            .unwrap_or_default()
            .into_iter()
            .map(xtream::map_epg_listing)
            .collect();

        self.store
            .upsert_epg_programs(&programs)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;
        Ok(programs.len())
    }

    /// Ages out EPG programmes and watch history per the retention policy.
    /// Returns the pruned (programmes, history entries) counts.
    pub async fn prune(&self, now_ms: i64) -> Result<(u64, u64), SyncError> {
        let epg_cutoff = now_ms - self.retention.epg_retention_days * MILLIS_PER_DAY;
        let history_cutoff = now_ms - self.retention.history_retention_days * MILLIS_PER_DAY;

        let programs = self
            .store
            .prune_epg_before(epg_cutoff)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;
        let history = self
            .store
            .prune_history_before(history_cutoff)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;

        info!(
            "Pruned {} EPG programmes and {} history entries",
            programs, history
        );
        Ok((programs, history))
    }

    /// Folds TMDB details into a stored movie. Returns false without
    /// touching the row when no TMDB client is configured, the movie is
    /// unknown, it carries no numeric TMDB id, or TMDB has no record.
    pub async fn refresh_movie_metadata(&self, movie_id: i32) -> Result<bool, SyncError> {
        let Some(tmdb_client) = &self.tmdb else {
            return Ok(false);
        };
        let Some(movie) = self
            .store
            .get_movie(movie_id)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?
        else {
            return Ok(false);
        };
        let Some(tmdb_id) = movie
            .tmdb_id
            .as_deref()
            .and_then(|id| id.parse::<i32>().ok())
        else {
            return Ok(false);
        };

        let Some(details) = tmdb_client
            .movie_details(tmdb_id)
            .await
            .map_err(|e| SyncError::Metadata(e.to_string()))?
        else {
            return Ok(false);
        };

        let enriched = tmdb::enrich_movie(&movie, &details);
        self.store
            .update_movie(&enriched)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;
        Ok(true)
    }

    /// Folds TMDB details into a stored series, with the same skip rules
    /// as [`Self::refresh_movie_metadata`].
    pub async fn refresh_series_metadata(&self, series_id: i32) -> Result<bool, SyncError> {
        let Some(tmdb_client) = &self.tmdb else {
            return Ok(false);
        };
        let Some(series) = self
            .store
            .get_series(series_id)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?
        else {
            return Ok(false);
        };
        let Some(tmdb_id) = series
            .tmdb_id
            .as_deref()
            .and_then(|id| id.parse::<i32>().ok())
        else {
            return Ok(false);
        };

        let Some(details) = tmdb_client
            .tv_details(tmdb_id)
            .await
            .map_err(|e| SyncError::Metadata(e.to_string()))?
        else {
            return Ok(false);
        };

        let enriched = tmdb::enrich_series(&series, &details);
        self.store
            .update_series(&enriched)
            .await
            .map_err(|e| SyncError::Database(e.to_string()))?;
        Ok(true)
    }
}

/// Category id to display name lookup for resolving stream rows.
fn category_name_index(categories: &[StreamCategory]) -> HashMap<String, String> {
    categories
        .iter()
        .map(|category| (category.category_id.clone(), category.category_name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> StreamCategory {
        StreamCategory {
            category_id: id.to_string(),
            category_name: name.to_string(),
            parent_id: 0,
        }
    }

    #[test]
    fn category_index_resolves_names() {
        let index = category_name_index(&[category("1", "News"), category("2", "Sports")]);
        assert_eq!(index.get("1").map(String::as_str), Some("News"));
        assert_eq!(index.get("2").map(String::as_str), Some("Sports"));
        assert_eq!(index.get("3"), None);
    }

    #[test]
    fn category_index_is_empty_for_no_categories() {
        assert!(category_name_index(&[]).is_empty());
    }

    #[test]
    fn retention_cutoffs_scale_by_day() {
        let retention = SyncConfig {
            epg_retention_days: 7,
            history_retention_days: 90,
        };
        let now = 100 * MILLIS_PER_DAY;
        assert_eq!(
            now - retention.epg_retention_days * MILLIS_PER_DAY,
            93 * MILLIS_PER_DAY
        );
        assert_eq!(
            now - retention.history_retention_days * MILLIS_PER_DAY,
            10 * MILLIS_PER_DAY
        );
    }
}
