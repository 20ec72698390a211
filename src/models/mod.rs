pub mod content;
pub mod settings;

pub use content::{
    Category, CategoryKind, Channel, ContentType, Episode, EpgProgram, FavoriteItem, Movie,
    Season, TvSeries, WatchHistoryItem,
};
pub use settings::{
    AppSettings, AppTheme, ParentalControl, PlaybackQuality, SubtitleSize, UserCredentials,
};
