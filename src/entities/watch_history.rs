use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "watch_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub content_id: String,
    pub content_type: String,
    pub title: String,
    pub poster_url: Option<String>,
    /// Resume offset in millis.
    pub last_watched_position: i64,
    /// Total runtime in millis; 0 when unknown.
    pub duration: i64,
    pub last_watched_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
