use serde::{Deserialize, Serialize};

/// Kind of content a favorite or watch-history row points at.
///
/// Stored as a fixed tag string; decoding an unknown tag falls back to
/// `LiveTv` rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "LiveTV")]
    LiveTv,
    Movie,
    Series,
}

impl ContentType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LiveTv => "LiveTV",
            Self::Movie => "Movie",
            Self::Series => "Series",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Movie" => Self::Movie,
            "Series" => Self::Series,
            _ => Self::LiveTv,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Section of the provider catalog a category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Live,
    Vod,
    Series,
}

impl CategoryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Vod => "vod",
            Self::Series => "series",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "vod" => Self::Vod,
            "series" => Self::Series,
            _ => Self::Live,
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
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
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub name: String,
    pub stream_url: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub category_id: String,
    pub category_name: String,
    pub rating: f64,
    pub year: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub tmdb_id: Option<String>,
    pub trailer_url: Option<String>,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvSeries {
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
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: i32,
    pub series_id: i32,
    pub season_number: i32,
    pub name: String,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub episode_count: i32,
    pub air_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub parent_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpgProgram {
    pub id: String,
    pub channel_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Epoch milliseconds.
    pub start_time: i64,
    /// Epoch milliseconds.
    pub end_time: i64,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub content_id: String,
    pub content_type: ContentType,
    pub title: String,
    pub poster_url: Option<String>,
    /// Epoch milliseconds.
    pub added_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchHistoryItem {
    pub content_id: String,
    pub content_type: ContentType,
    pub title: String,
    pub poster_url: Option<String>,
    /// Resume offset in milliseconds.
    pub last_watched_position: i64,
    /// Total runtime in milliseconds.
    pub duration: i64,
    /// Epoch milliseconds.
    pub last_watched_at: i64,
}

impl WatchHistoryItem {
    /// Fraction watched, 0.0 when the runtime is unknown.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration > 0 {
            self.last_watched_position as f32 / self.duration as f32
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_tags_round_trip() {
        for ct in [ContentType::LiveTv, ContentType::Movie, ContentType::Series] {
            assert_eq!(ContentType::from_tag(ct.as_str()), ct);
        }
    }

    #[test]
    fn unknown_content_type_falls_back_to_live() {
        assert_eq!(ContentType::from_tag("Radio"), ContentType::LiveTv);
        assert_eq!(ContentType::from_tag(""), ContentType::LiveTv);
        assert_eq!(ContentType::from_tag("movie"), ContentType::LiveTv);
    }

    #[test]
    fn category_kind_tags_round_trip() {
        for kind in [CategoryKind::Live, CategoryKind::Vod, CategoryKind::Series] {
            assert_eq!(CategoryKind::from_tag(kind.as_str()), kind);
        }
        assert_eq!(CategoryKind::from_tag("radio"), CategoryKind::Live);
    }

    #[test]
    fn progress_is_position_over_duration() {
        let item = WatchHistoryItem {
            content_id: "42".to_string(),
            content_type: ContentType::Movie,
            title: "Some Film".to_string(),
            poster_url: None,
            last_watched_position: 1_500,
            duration: 6_000,
            last_watched_at: 0,
        };
        assert!((item.progress() - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn progress_is_zero_without_duration() {
        let item = WatchHistoryItem {
            content_id: "42".to_string(),
            content_type: ContentType::LiveTv,
            title: "Some Channel".to_string(),
            poster_url: None,
            last_watched_position: 1_500,
            duration: 0,
            last_watched_at: 0,
        };
        assert_eq!(item.progress(), 0.0);
    }
}
