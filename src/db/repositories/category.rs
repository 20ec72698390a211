use crate::entities::{category, prelude::*};
use crate::models::{Category, CategoryKind};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};

pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: category::Model) -> Category {
        Category {
            id: model.id,
            name: model.name,
            parent_id: model.parent_id,
        }
    }

    fn active_model(category: &Category, kind: CategoryKind) -> category::ActiveModel {
        category::ActiveModel {
            id: Set(category.id.clone()),
            name: Set(category.name.clone()),
            parent_id: Set(category.parent_id),
            kind: Set(kind.as_str().to_string()),
        }
    }

    fn replace_conflict() -> OnConflict {
        OnConflict::column(category::Column::Id)
            .update_columns([
                category::Column::Name,
                category::Column::ParentId,
                category::Column::Kind,
            ])
            .to_owned()
    }

    pub async fn list_by_kind(&self, kind: CategoryKind) -> Result<Vec<Category>> {
        let rows = Categories::find()
            .filter(category::Column::Kind.eq(kind.as_str()))
            .order_by_asc(category::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Category>> {
        let rows = Categories::find()
            .order_by_asc(category::Column::Name)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<Category>> {
        let row = Categories::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn upsert_many(&self, categories: &[Category], kind: CategoryKind) -> Result<()> {
        if categories.is_empty() {
            return Ok(());
        }

        Categories::insert_many(categories.iter().map(|c| Self::active_model(c, kind)))
            .on_conflict(Self::replace_conflict())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn upsert(&self, category: &Category, kind: CategoryKind) -> Result<()> {
        Categories::insert(Self::active_model(category, kind))
            .on_conflict(Self::replace_conflict())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn update(&self, category: &Category, kind: CategoryKind) -> Result<()> {
        match Categories::update(Self::active_model(category, kind))
            .exec(&self.conn)
            .await
        {
            Ok(_) | Err(DbErr::RecordNotUpdated) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = Categories::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Clears one section of the catalog ahead of a re-sync.
    pub async fn delete_by_kind(&self, kind: CategoryKind) -> Result<u64> {
        let result = Categories::delete_many()
            .filter(category::Column::Kind.eq(kind.as_str()))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}
