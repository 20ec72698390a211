use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "epg_programs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Soft reference to a channel's `epg_channel_id`.
    pub channel_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Epoch millis.
    pub start_time: i64,
    /// Epoch millis.
    pub end_time: i64,
    pub language: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
