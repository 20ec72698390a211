pub mod prelude;

pub mod category;
pub mod channel;
pub mod episode;
pub mod epg_program;
pub mod favorite;
pub mod movie;
pub mod season;
pub mod tv_series;
pub mod user_credentials;
pub mod user_settings;
pub mod watch_history;
