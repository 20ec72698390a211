use crate::entities::{favorite, prelude::*};
use crate::models::{ContentType, FavoriteItem};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

impl FavoriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: favorite::Model) -> FavoriteItem {
        FavoriteItem {
            content_id: model.content_id,
            content_type: ContentType::from_tag(&model.content_type),
            title: model.title,
            poster_url: model.poster_url,
            added_at: model.added_at,
        }
    }

    fn active_model(item: &FavoriteItem) -> favorite::ActiveModel {
        favorite::ActiveModel {
            content_id: Set(item.content_id.clone()),
            content_type: Set(item.content_type.as_str().to_string()),
            title: Set(item.title.clone()),
            poster_url: Set(item.poster_url.clone()),
            added_at: Set(item.added_at),
        }
    }

    pub async fn list_all(&self) -> Result<Vec<FavoriteItem>> {
        let rows = Favorites::find()
            .order_by_desc(favorite::Column::AddedAt)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_by_type(&self, content_type: ContentType) -> Result<Vec<FavoriteItem>> {
        let rows = Favorites::find()
            .filter(favorite::Column::ContentType.eq(content_type.as_str()))
            .order_by_desc(favorite::Column::AddedAt)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(
        &self,
        content_id: &str,
        content_type: ContentType,
    ) -> Result<Option<FavoriteItem>> {
        let row = Favorites::find_by_id((
            content_id.to_string(),
            content_type.as_str().to_string(),
        ))
        .one(&self.conn)
        .await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn is_favorite(&self, content_id: &str, content_type: ContentType) -> Result<bool> {
        let count = Favorites::find()
            .filter(favorite::Column::ContentId.eq(content_id))
            .filter(favorite::Column::ContentType.eq(content_type.as_str()))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn upsert(&self, item: &FavoriteItem) -> Result<()> {
        Favorites::insert(Self::active_model(item))
            .on_conflict(
                OnConflict::columns([
                    favorite::Column::ContentId,
                    favorite::Column::ContentType,
                ])
                .update_columns([
                    favorite::Column::Title,
                    favorite::Column::PosterUrl,
                    favorite::Column::AddedAt,
                ])
                .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, content_id: &str, content_type: ContentType) -> Result<bool> {
        let result = Favorites::delete_by_id((
            content_id.to_string(),
            content_type.as_str().to_string(),
        ))
        .exec(&self.conn)
        .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn clear(&self) -> Result<u64> {
        let result = Favorites::delete_many().exec(&self.conn).await?;
        Ok(result.rows_affected)
    }
}
