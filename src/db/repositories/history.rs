use crate::entities::{prelude::*, watch_history};
use crate::models::{ContentType, WatchHistoryItem};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

const DEFAULT_HISTORY_LIMIT: u64 = 50;

pub struct HistoryRepository {
    conn: DatabaseConnection,
}

impl HistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: watch_history::Model) -> WatchHistoryItem {
        WatchHistoryItem {
            content_id: model.content_id,
            content_type: ContentType::from_tag(&model.content_type),
            title: model.title,
            poster_url: model.poster_url,
            last_watched_position: model.last_watched_position,
            duration: model.duration,
            last_watched_at: model.last_watched_at,
        }
    }

    fn active_model(item: &WatchHistoryItem) -> watch_history::ActiveModel {
        watch_history::ActiveModel {
            content_id: Set(item.content_id.clone()),
            content_type: Set(item.content_type.as_str().to_string()),
            title: Set(item.title.clone()),
            poster_url: Set(item.poster_url.clone()),
            last_watched_position: Set(item.last_watched_position),
            duration: Set(item.duration),
            last_watched_at: Set(item.last_watched_at),
        }
    }

    fn replace_conflict() -> OnConflict {
        OnConflict::column(watch_history::Column::ContentId)
            .update_columns([
                watch_history::Column::ContentType,
                watch_history::Column::Title,
                watch_history::Column::PosterUrl,
                watch_history::Column::LastWatchedPosition,
                watch_history::Column::Duration,
                watch_history::Column::LastWatchedAt,
            ])
            .to_owned()
    }

    pub async fn list_recent(&self, limit: Option<u64>) -> Result<Vec<WatchHistoryItem>> {
        let rows = WatchHistory::find()
            .order_by_desc(watch_history::Column::LastWatchedAt)
            .limit(limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_by_type(&self, content_type: ContentType) -> Result<Vec<WatchHistoryItem>> {
        let rows = WatchHistory::find()
            .filter(watch_history::Column::ContentType.eq(content_type.as_str()))
            .order_by_desc(watch_history::Column::LastWatchedAt)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, content_id: &str) -> Result<Option<WatchHistoryItem>> {
        let row = WatchHistory::find_by_id(content_id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn upsert(&self, item: &WatchHistoryItem) -> Result<()> {
        WatchHistory::insert(Self::active_model(item))
            .on_conflict(Self::replace_conflict())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    /// Update by content id; a missing row is a silent no-op.
    pub async fn update(&self, item: &WatchHistoryItem) -> Result<()> {
        match WatchHistory::update(Self::active_model(item))
            .exec(&self.conn)
            .await
        {
            Ok(_) | Err(DbErr::RecordNotUpdated) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, content_id: &str) -> Result<bool> {
        let result = WatchHistory::delete_by_id(content_id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Drops entries last touched strictly before the cutoff.
    pub async fn prune_before(&self, cutoff: i64) -> Result<u64> {
        let result = WatchHistory::delete_many()
            .filter(watch_history::Column::LastWatchedAt.lt(cutoff))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn clear(&self) -> Result<u64> {
        let result = WatchHistory::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }
}
