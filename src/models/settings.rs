use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppTheme {
    Light,
    Dark,
    System,
}

impl AppTheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "LIGHT",
            Self::Dark => "DARK",
            Self::System => "SYSTEM",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "LIGHT" => Self::Light,
            "DARK" => Self::Dark,
            _ => Self::System,
        }
    }
}

/// Stream quality preference. `value` is the stored form handed to the
/// player, `label` what a UI would display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackQuality {
    Auto,
    Low,
    Medium,
    High,
    UltraHigh,
}

impl PlaybackQuality {
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Low => "480",
            Self::Medium => "720",
            Self::High => "1080",
            Self::UltraHigh => "2160",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Low => "480p",
            Self::Medium => "720p",
            Self::High => "1080p",
            Self::UltraHigh => "4K",
        }
    }

    #[must_use]
    pub fn from_value(value: &str) -> Self {
        match value {
            "480" => Self::Low,
            "720" => Self::Medium,
            "1080" => Self::High,
            "2160" => Self::UltraHigh,
            _ => Self::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubtitleSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl SubtitleSize {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "SMALL",
            Self::Medium => "MEDIUM",
            Self::Large => "LARGE",
            Self::ExtraLarge => "EXTRA_LARGE",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "SMALL" => Self::Small,
            "LARGE" => Self::Large,
            "EXTRA_LARGE" => Self::ExtraLarge,
            _ => Self::Medium,
        }
    }

    /// Font scale factor relative to the default size.
    #[must_use]
    pub const fn scale(self) -> f32 {
        match self {
            Self::Small => 0.8,
            Self::Medium => 1.0,
            Self::Large => 1.2,
            Self::ExtraLarge => 1.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParentalControl {
    pub enabled: bool,
    pub pin: Option<String>,
    pub blocked_categories: Vec<String>,
    pub max_rating: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub theme: AppTheme,
    pub playback_quality: PlaybackQuality,
    pub auto_play: bool,
    pub show_subtitles: bool,
    pub subtitle_size: SubtitleSize,
    pub parental_control: ParentalControl,
    pub tmdb_api_key: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: AppTheme::System,
            playback_quality: PlaybackQuality::Auto,
            auto_play: true,
            show_subtitles: false,
            subtitle_size: SubtitleSize::Medium,
            parental_control: ParentalControl::default(),
            tmdb_api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    pub server_url: String,
    pub username: String,
    pub password: String,
    pub port: String,
}

impl Default for UserCredentials {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            username: String::new(),
            password: String::new(),
            port: "80".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_values_round_trip() {
        for q in [
            PlaybackQuality::Auto,
            PlaybackQuality::Low,
            PlaybackQuality::Medium,
            PlaybackQuality::High,
            PlaybackQuality::UltraHigh,
        ] {
            assert_eq!(PlaybackQuality::from_value(q.value()), q);
        }
    }

    #[test]
    fn unknown_quality_falls_back_to_auto() {
        assert_eq!(PlaybackQuality::from_value("8K"), PlaybackQuality::Auto);
        assert_eq!(PlaybackQuality::from_value(""), PlaybackQuality::Auto);
    }

    #[test]
    fn quality_labels() {
        assert_eq!(PlaybackQuality::Auto.label(), "Auto");
        assert_eq!(PlaybackQuality::Low.label(), "480p");
        assert_eq!(PlaybackQuality::UltraHigh.label(), "4K");
    }

    #[test]
    fn theme_tags_round_trip_with_system_fallback() {
        for t in [AppTheme::Light, AppTheme::Dark, AppTheme::System] {
            assert_eq!(AppTheme::from_tag(t.as_str()), t);
        }
        assert_eq!(AppTheme::from_tag("sepia"), AppTheme::System);
    }

    #[test]
    fn subtitle_size_scales() {
        assert_eq!(SubtitleSize::from_tag("EXTRA_LARGE").scale(), 1.4);
        assert_eq!(SubtitleSize::from_tag("bogus"), SubtitleSize::Medium);
        assert_eq!(SubtitleSize::Medium.scale(), 1.0);
    }

    #[test]
    fn default_settings_match_first_run() {
        let settings = AppSettings::default();
        assert_eq!(settings.theme, AppTheme::System);
        assert_eq!(settings.playback_quality, PlaybackQuality::Auto);
        assert!(settings.auto_play);
        assert!(!settings.show_subtitles);
        assert!(!settings.parental_control.enabled);
        assert!(settings.parental_control.blocked_categories.is_empty());
    }

    #[test]
    fn default_credentials_use_port_80() {
        assert_eq!(UserCredentials::default().port, "80");
    }
}
