use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "episodes")]
pub struct Model {
    /// Provider episode id, kept in its wire form.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub series_id: i32,
    pub season_number: i32,
    pub episode_number: i32,
    pub title: String,
    pub stream_url: String,
    pub overview: Option<String>,
    pub still_url: Option<String>,
    pub duration: Option<String>,
    pub air_date: Option<String>,
    pub rating: f64,
    pub tmdb_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
