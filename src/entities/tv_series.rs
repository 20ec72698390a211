use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tv_series")]
pub struct Model {
    /// Provider series id.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub category_id: String,
    pub category_name: String,
    pub rating: f64,
    pub year: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub tmdb_id: Option<String>,
    pub trailer_url: Option<String>,
    pub total_seasons: i32,
    pub total_episodes: i32,
    pub is_favorite: bool,
    pub last_watched: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
