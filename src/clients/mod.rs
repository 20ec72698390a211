pub mod tmdb;
pub mod xtream;

pub use tmdb::TmdbClient;
pub use xtream::XtreamClient;
