use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "channels")]
pub struct Model {
    /// Provider stream id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub stream_url: String,
    pub icon_url: Option<String>,
    pub category_id: String,
    pub category_name: String,
    pub epg_channel_id: Option<String>,
    pub has_archive: bool,
    pub archive_duration: i32,
    pub is_favorite: bool,
    /// Epoch millis; 0 when never played.
    pub last_watched: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
