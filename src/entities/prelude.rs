pub use super::category::Entity as Categories;
pub use super::channel::Entity as Channels;
pub use super::episode::Entity as Episodes;
pub use super::epg_program::Entity as EpgPrograms;
pub use super::favorite::Entity as Favorites;
pub use super::movie::Entity as Movies;
pub use super::season::Entity as Seasons;
pub use super::tv_series::Entity as TvSeries;
pub use super::user_credentials::Entity as UserCredentials;
pub use super::user_settings::Entity as UserSettings;
pub use super::watch_history::Entity as WatchHistory;
