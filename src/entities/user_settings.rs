use sea_orm::entity::prelude::*;

/// Singleton row, always id 1.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub theme: String,
    pub playback_quality: String,
    pub auto_play: bool,
    pub show_subtitles: bool,
    pub subtitle_size: String,
    pub parental_control_enabled: bool,
    pub parental_control_pin: Option<String>,
    /// JSON string array of category ids.
    pub blocked_categories: String,
    pub max_rating: Option<String>,
    pub tmdb_api_key: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
