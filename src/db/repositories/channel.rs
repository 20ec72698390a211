use crate::entities::{channel, prelude::*};
use crate::models::Channel;
use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

const DEFAULT_RECENT_LIMIT: u64 = 10;

pub struct ChannelRepository {
    conn: DatabaseConnection,
}

impl ChannelRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: channel::Model) -> Channel {
        Channel {
            id: model.id,
            name: model.name,
            stream_url: model.stream_url,
            icon_url: model.icon_url,
            category_id: model.category_id,
            category_name: model.category_name,
            epg_channel_id: model.epg_channel_id,
            has_archive: model.has_archive,
            archive_duration: model.archive_duration,
            is_favorite: model.is_favorite,
        }
    }

    fn active_model(channel: &Channel) -> channel::ActiveModel {
        channel::ActiveModel {
            id: Set(channel.id),
            name: Set(channel.name.clone()),
            stream_url: Set(channel.stream_url.clone()),
            icon_url: Set(channel.icon_url.clone()),
            category_id: Set(channel.category_id.clone()),
            category_name: Set(channel.category_name.clone()),
            epg_channel_id: Set(channel.epg_channel_id.clone()),
            has_archive: Set(channel.has_archive),
            archive_duration: Set(channel.archive_duration),
            is_favorite: Set(channel.is_favorite),
            last_watched: Set(0),
        }
    }

    fn replace_conflict() -> OnConflict {
        OnConflict::column(channel::Column::Id)
            .update_columns([
                channel::Column::Name,
                channel::Column::StreamUrl,
                channel::Column::IconUrl,
                channel::Column::CategoryId,
                channel::Column::CategoryName,
                channel::Column::EpgChannelId,
                channel::Column::HasArchive,
                channel::Column::ArchiveDuration,
                channel::Column::IsFavorite,
                channel::Column::LastWatched,
            ])
            .to_owned()
    }

    pub async fn list_all(&self) -> Result<Vec<Channel>> {
        let rows = Channels::find()
            .order_by_asc(channel::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_by_category(&self, category_id: &str) -> Result<Vec<Channel>> {
        let rows = Channels::find()
            .filter(channel::Column::CategoryId.eq(category_id))
            .order_by_asc(channel::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_favorites(&self) -> Result<Vec<Channel>> {
        let rows = Channels::find()
            .filter(channel::Column::IsFavorite.eq(true))
            .order_by_asc(channel::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Channel>> {
        let rows = Channels::find()
            .filter(channel::Column::Name.contains(query))
            .order_by_asc(channel::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Channel>> {
        let row = Channels::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn list_recent(&self, limit: Option<u64>) -> Result<Vec<Channel>> {
        let rows = Channels::find()
            .order_by_desc(channel::Column::LastWatched)
            .limit(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn upsert_many(&self, channels: &[Channel]) -> Result<()> {
        if channels.is_empty() {
            return Ok(());
        }

        Channels::insert_many(channels.iter().map(Self::active_model))
            .on_conflict(Self::replace_conflict())
            .exec(&self.conn)
            .await?;

        info!("Stored {} channels", channels.len());
        Ok(())
    }

    pub async fn upsert(&self, channel: &Channel) -> Result<()> {
        Channels::insert(Self::active_model(channel))
            .on_conflict(Self::replace_conflict())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    /// Full-row update by id; a missing row is a silent no-op.
    pub async fn update(&self, channel: &Channel) -> Result<()> {
        let model = channel::ActiveModel {
            last_watched: sea_orm::NotSet,
            ..Self::active_model(channel)
        };
        match Channels::update(model).exec(&self.conn).await {
            Ok(_) | Err(DbErr::RecordNotUpdated) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn set_favorite(&self, id: i32, is_favorite: bool) -> Result<()> {
        Channels::update_many()
            .col_expr(channel::Column::IsFavorite, Expr::value(is_favorite))
            .filter(channel::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn touch_last_watched(&self, id: i32, timestamp: i64) -> Result<()> {
        Channels::update_many()
            .col_expr(channel::Column::LastWatched, Expr::value(timestamp))
            .filter(channel::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Channels::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn clear(&self) -> Result<u64> {
        let result = Channels::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }
}
