//! Storage for series and their season/episode detail rows.
//!
//! The three tables travel together on the write side: a detail sync
//! stores the series row, its seasons and its episodes in one pass.
//! Season and episode rows reference their series by plain id, with no
//! schema-level cascade.

use crate::entities::{episode, season, tv_series};
use crate::models::{Episode, Season, TvSeries};
use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

const DEFAULT_RECENT_LIMIT: u64 = 10;

pub struct SeriesRepository {
    conn: DatabaseConnection,
}

impl SeriesRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_series(model: tv_series::Model) -> TvSeries {
        TvSeries {
            id: model.id,
            name: model.name,
            poster_url: model.poster_url,
            backdrop_url: model.backdrop_url,
            category_id: model.category_id,
            category_name: model.category_name,
            rating: model.rating,
            year: model.year,
            description: model.description,
            genre: model.genre,
            director: model.director,
            cast: model.cast,
            tmdb_id: model.tmdb_id,
            trailer_url: model.trailer_url,
            total_seasons: model.total_seasons,
            total_episodes: model.total_episodes,
            is_favorite: model.is_favorite,
        }
    }

    fn series_active_model(series: &TvSeries) -> tv_series::ActiveModel {
        tv_series::ActiveModel {
            id: Set(series.id),
            name: Set(series.name.clone()),
            poster_url: Set(series.poster_url.clone()),
            backdrop_url: Set(series.backdrop_url.clone()),
            category_id: Set(series.category_id.clone()),
            category_name: Set(series.category_name.clone()),
            rating: Set(series.rating),
            year: Set(series.year.clone()),
            description: Set(series.description.clone()),
            genre: Set(series.genre.clone()),
            director: Set(series.director.clone()),
            cast: Set(series.cast.clone()),
            tmdb_id: Set(series.tmdb_id.clone()),
            trailer_url: Set(series.trailer_url.clone()),
            total_seasons: Set(series.total_seasons),
            total_episodes: Set(series.total_episodes),
            is_favorite: Set(series.is_favorite),
            last_watched: Set(0),
        }
    }

    fn series_replace_conflict() -> OnConflict {
        OnConflict::column(tv_series::Column::Id)
            .update_columns([
                tv_series::Column::Name,
                tv_series::Column::PosterUrl,
                tv_series::Column::BackdropUrl,
                tv_series::Column::CategoryId,
                tv_series::Column::CategoryName,
                tv_series::Column::Rating,
                tv_series::Column::Year,
                tv_series::Column::Description,
                tv_series::Column::Genre,
                tv_series::Column::Director,
                tv_series::Column::Cast,
                tv_series::Column::TmdbId,
                tv_series::Column::TrailerUrl,
                tv_series::Column::TotalSeasons,
                tv_series::Column::TotalEpisodes,
                tv_series::Column::IsFavorite,
                tv_series::Column::LastWatched,
            ])
            .to_owned()
    }

    pub async fn list_all(&self) -> Result<Vec<TvSeries>> {
        let rows = tv_series::Entity::find()
            .order_by_asc(tv_series::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_series).collect())
    }

    pub async fn list_by_category(&self, category_id: &str) -> Result<Vec<TvSeries>> {
        let rows = tv_series::Entity::find()
            .filter(tv_series::Column::CategoryId.eq(category_id))
            .order_by_asc(tv_series::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_series).collect())
    }

    pub async fn list_favorites(&self) -> Result<Vec<TvSeries>> {
        let rows = tv_series::Entity::find()
            .filter(tv_series::Column::IsFavorite.eq(true))
            .order_by_asc(tv_series::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_series).collect())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<TvSeries>> {
        let rows = tv_series::Entity::find()
            .filter(tv_series::Column::Name.contains(query))
            .order_by_asc(tv_series::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_series).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<TvSeries>> {
        let row = tv_series::Entity::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_series))
    }

    pub async fn list_recent(&self, limit: Option<u64>) -> Result<Vec<TvSeries>> {
        let rows = tv_series::Entity::find()
            .order_by_desc(tv_series::Column::LastWatched)
            .limit(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_series).collect())
    }

    pub async fn upsert_many(&self, series: &[TvSeries]) -> Result<()> {
        if series.is_empty() {
            return Ok(());
        }

        tv_series::Entity::insert_many(series.iter().map(Self::series_active_model))
            .on_conflict(Self::series_replace_conflict())
            .exec(&self.conn)
            .await?;

        info!("Stored {} series", series.len());
        Ok(())
    }

    pub async fn upsert(&self, series: &TvSeries) -> Result<()> {
        tv_series::Entity::insert(Self::series_active_model(series))
            .on_conflict(Self::series_replace_conflict())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    /// Full-row update by id; a missing row is a silent no-op.
    pub async fn update(&self, series: &TvSeries) -> Result<()> {
        let model = tv_series::ActiveModel {
            last_watched: sea_orm::NotSet,
            ..Self::series_active_model(series)
        };
        match tv_series::Entity::update(model).exec(&self.conn).await {
            Ok(_) | Err(DbErr::RecordNotUpdated) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn set_favorite(&self, id: i32, is_favorite: bool) -> Result<()> {
        tv_series::Entity::update_many()
            .col_expr(tv_series::Column::IsFavorite, Expr::value(is_favorite))
            .filter(tv_series::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn touch_last_watched(&self, id: i32, timestamp: i64) -> Result<()> {
        tv_series::Entity::update_many()
            .col_expr(tv_series::Column::LastWatched, Expr::value(timestamp))
            .filter(tv_series::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = tv_series::Entity::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn clear(&self) -> Result<u64> {
        let result = tv_series::Entity::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }

    fn map_season(model: season::Model) -> Season {
        Season {
            id: model.id,
            series_id: model.series_id,
            season_number: model.season_number,
            name: model.name,
            overview: model.overview,
            poster_url: model.poster_url,
            episode_count: model.episode_count,
            air_date: model.air_date,
        }
    }

    fn season_active_model(season: &Season) -> season::ActiveModel {
        season::ActiveModel {
            id: Set(season.id),
            series_id: Set(season.series_id),
            season_number: Set(season.season_number),
            name: Set(season.name.clone()),
            overview: Set(season.overview.clone()),
            poster_url: Set(season.poster_url.clone()),
            episode_count: Set(season.episode_count),
            air_date: Set(season.air_date.clone()),
        }
    }

    fn season_replace_conflict() -> OnConflict {
        OnConflict::column(season::Column::Id)
            .update_columns([
                season::Column::SeriesId,
                season::Column::SeasonNumber,
                season::Column::Name,
                season::Column::Overview,
                season::Column::PosterUrl,
                season::Column::EpisodeCount,
                season::Column::AirDate,
            ])
            .to_owned()
    }

    pub async fn seasons_for_series(&self, series_id: i32) -> Result<Vec<Season>> {
        let rows = season::Entity::find()
            .filter(season::Column::SeriesId.eq(series_id))
            .order_by_asc(season::Column::SeasonNumber)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_season).collect())
    }

    pub async fn get_season(&self, id: i32) -> Result<Option<Season>> {
        let row = season::Entity::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_season))
    }

    pub async fn upsert_seasons(&self, seasons: &[Season]) -> Result<()> {
        if seasons.is_empty() {
            return Ok(());
        }

        season::Entity::insert_many(seasons.iter().map(Self::season_active_model))
            .on_conflict(Self::season_replace_conflict())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn upsert_season(&self, season: &Season) -> Result<()> {
        season::Entity::insert(Self::season_active_model(season))
            .on_conflict(Self::season_replace_conflict())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn update_season(&self, season: &Season) -> Result<()> {
        match season::Entity::update(Self::season_active_model(season))
            .exec(&self.conn)
            .await
        {
            Ok(_) | Err(DbErr::RecordNotUpdated) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_season(&self, id: i32) -> Result<bool> {
        let result = season::Entity::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_seasons_for_series(&self, series_id: i32) -> Result<u64> {
        let result = season::Entity::delete_many()
            .filter(season::Column::SeriesId.eq(series_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    fn map_episode(model: episode::Model) -> Episode {
        Episode {
            id: model.id,
            series_id: model.series_id,
            season_number: model.season_number,
            episode_number: model.episode_number,
            title: model.title,
            stream_url: model.stream_url,
            overview: model.overview,
            still_url: model.still_url,
            duration: model.duration,
            air_date: model.air_date,
            rating: model.rating,
            tmdb_id: model.tmdb_id,
        }
    }

    fn episode_active_model(episode: &Episode) -> episode::ActiveModel {
        episode::ActiveModel {
            id: Set(episode.id.clone()),
            series_id: Set(episode.series_id),
            season_number: Set(episode.season_number),
            episode_number: Set(episode.episode_number),
            title: Set(episode.title.clone()),
            stream_url: Set(episode.stream_url.clone()),
            overview: Set(episode.overview.clone()),
            still_url: Set(episode.still_url.clone()),
            duration: Set(episode.duration.clone()),
            air_date: Set(episode.air_date.clone()),
            rating: Set(episode.rating),
            tmdb_id: Set(episode.tmdb_id.clone()),
        }
    }

    fn episode_replace_conflict() -> OnConflict {
        OnConflict::column(episode::Column::Id)
            .update_columns([
                episode::Column::SeriesId,
                episode::Column::SeasonNumber,
                episode::Column::EpisodeNumber,
                episode::Column::Title,
                episode::Column::StreamUrl,
                episode::Column::Overview,
                episode::Column::StillUrl,
                episode::Column::Duration,
                episode::Column::AirDate,
                episode::Column::Rating,
                episode::Column::TmdbId,
            ])
            .to_owned()
    }

    pub async fn episodes_for_season(
        &self,
        series_id: i32,
        season_number: i32,
    ) -> Result<Vec<Episode>> {
        let rows = episode::Entity::find()
            .filter(episode::Column::SeriesId.eq(series_id))
            .filter(episode::Column::SeasonNumber.eq(season_number))
            .order_by_asc(episode::Column::EpisodeNumber)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_episode).collect())
    }

    pub async fn episodes_for_series(&self, series_id: i32) -> Result<Vec<Episode>> {
        let rows = episode::Entity::find()
            .filter(episode::Column::SeriesId.eq(series_id))
            .order_by_asc(episode::Column::SeasonNumber)
            .order_by_asc(episode::Column::EpisodeNumber)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_episode).collect())
    }

    pub async fn get_episode(&self, id: &str) -> Result<Option<Episode>> {
        let row = episode::Entity::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_episode))
    }

    pub async fn upsert_episodes(&self, episodes: &[Episode]) -> Result<()> {
        if episodes.is_empty() {
            return Ok(());
        }

        episode::Entity::insert_many(episodes.iter().map(Self::episode_active_model))
            .on_conflict(Self::episode_replace_conflict())
            .exec(&self.conn)
            .await?;

        info!("Stored {} episodes", episodes.len());
        Ok(())
    }

    pub async fn upsert_episode(&self, episode: &Episode) -> Result<()> {
        episode::Entity::insert(Self::episode_active_model(episode))
            .on_conflict(Self::episode_replace_conflict())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn update_episode(&self, episode: &Episode) -> Result<()> {
        match episode::Entity::update(Self::episode_active_model(episode))
            .exec(&self.conn)
            .await
        {
            Ok(_) | Err(DbErr::RecordNotUpdated) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete_episode(&self, id: &str) -> Result<bool> {
        let result = episode::Entity::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_episodes_for_series(&self, series_id: i32) -> Result<u64> {
        let result = episode::Entity::delete_many()
            .filter(episode::Column::SeriesId.eq(series_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}
