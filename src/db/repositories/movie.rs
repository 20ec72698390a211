use crate::entities::{movie, prelude::*};
use crate::models::Movie;
use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

const DEFAULT_RECENT_LIMIT: u64 = 10;
const DEFAULT_FEATURED_LIMIT: u64 = 20;
const FEATURED_MIN_RATING: f64 = 7.0;

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: movie::Model) -> Movie {
        Movie {
            id: model.id,
            name: model.name,
            stream_url: model.stream_url,
            poster_url: model.poster_url,
            backdrop_url: model.backdrop_url,
            category_id: model.category_id,
            category_name: model.category_name,
            rating: model.rating,
            year: model.year,
            duration: model.duration,
            description: model.description,
            genre: model.genre,
            director: model.director,
            cast: model.cast,
            tmdb_id: model.tmdb_id,
            trailer_url: model.trailer_url,
            is_favorite: model.is_favorite,
        }
    }

    fn active_model(movie: &Movie) -> movie::ActiveModel {
        movie::ActiveModel {
            id: Set(movie.id),
            name: Set(movie.name.clone()),
            stream_url: Set(movie.stream_url.clone()),
            poster_url: Set(movie.poster_url.clone()),
            backdrop_url: Set(movie.backdrop_url.clone()),
            category_id: Set(movie.category_id.clone()),
            category_name: Set(movie.category_name.clone()),
            rating: Set(movie.rating),
            year: Set(movie.year.clone()),
            duration: Set(movie.duration.clone()),
            description: Set(movie.description.clone()),
            genre: Set(movie.genre.clone()),
            director: Set(movie.director.clone()),
            cast: Set(movie.cast.clone()),
            tmdb_id: Set(movie.tmdb_id.clone()),
            trailer_url: Set(movie.trailer_url.clone()),
            is_favorite: Set(movie.is_favorite),
            last_watched: Set(0),
        }
    }

    fn replace_conflict() -> OnConflict {
        OnConflict::column(movie::Column::Id)
            .update_columns([
                movie::Column::Name,
                movie::Column::StreamUrl,
                movie::Column::PosterUrl,
                movie::Column::BackdropUrl,
                movie::Column::CategoryId,
                movie::Column::CategoryName,
                movie::Column::Rating,
                movie::Column::Year,
                movie::Column::Duration,
                movie::Column::Description,
                movie::Column::Genre,
                movie::Column::Director,
                movie::Column::Cast,
                movie::Column::TmdbId,
                movie::Column::TrailerUrl,
                movie::Column::IsFavorite,
                movie::Column::LastWatched,
            ])
            .to_owned()
    }

    pub async fn list_all(&self) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .order_by_asc(movie::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_by_category(&self, category_id: &str) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .filter(movie::Column::CategoryId.eq(category_id))
            .order_by_asc(movie::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_favorites(&self) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .filter(movie::Column::IsFavorite.eq(true))
            .order_by_asc(movie::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .filter(movie::Column::Name.contains(query))
            .order_by_asc(movie::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let row = Movies::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn list_recent(&self, limit: Option<u64>) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .order_by_desc(movie::Column::LastWatched)
            .limit(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    /// Highest rated titles, used for the front-page shelf.
    pub async fn list_featured(&self, limit: Option<u64>) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .filter(movie::Column::Rating.gte(FEATURED_MIN_RATING))
            .order_by_desc(movie::Column::Rating)
            .limit(limit.unwrap_or(DEFAULT_FEATURED_LIMIT))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn upsert_many(&self, movies: &[Movie]) -> Result<()> {
        if movies.is_empty() {
            return Ok(());
        }

        Movies::insert_many(movies.iter().map(Self::active_model))
            .on_conflict(Self::replace_conflict())
            .exec(&self.conn)
            .await?;

        info!("Stored {} movies", movies.len());
        Ok(())
    }

    pub async fn upsert(&self, movie: &Movie) -> Result<()> {
        Movies::insert(Self::active_model(movie))
            .on_conflict(Self::replace_conflict())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    /// Full-row update by id; a missing row is a silent no-op.
    pub async fn update(&self, movie: &Movie) -> Result<()> {
        let model = movie::ActiveModel {
            last_watched: sea_orm::NotSet,
            ..Self::active_model(movie)
        };
        match Movies::update(model).exec(&self.conn).await {
            Ok(_) | Err(DbErr::RecordNotUpdated) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn set_favorite(&self, id: i32, is_favorite: bool) -> Result<()> {
        Movies::update_many()
            .col_expr(movie::Column::IsFavorite, Expr::value(is_favorite))
            .filter(movie::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn touch_last_watched(&self, id: i32, timestamp: i64) -> Result<()> {
        Movies::update_many()
            .col_expr(movie::Column::LastWatched, Expr::value(timestamp))
            .filter(movie::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Movies::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn clear(&self) -> Result<u64> {
        let result = Movies::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }
}
