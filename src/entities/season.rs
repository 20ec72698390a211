use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "seasons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Soft reference into `tv_series`; not enforced by the schema.
    pub series_id: i32,
    pub season_number: i32,
    pub name: String,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub episode_count: i32,
    pub air_date: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
