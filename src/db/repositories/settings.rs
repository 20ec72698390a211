//! Singleton rows for user settings and provider credentials.
//!
//! Both tables hold at most one row with id 1; saving writes through an
//! upsert so callers never have to care whether the row exists yet.

use crate::db::repositories::{decode_string_list, encode_string_list};
use crate::entities::{prelude::*, user_credentials, user_settings};
use crate::models::{
    AppSettings, AppTheme, ParentalControl, PlaybackQuality, SubtitleSize,
    UserCredentials as Credentials,
};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

const SINGLETON_ID: i32 = 1;

pub struct SettingsRepository {
    conn: DatabaseConnection,
}

impl SettingsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_settings(model: user_settings::Model) -> AppSettings {
        AppSettings {
            theme: AppTheme::from_tag(&model.theme),
            playback_quality: PlaybackQuality::from_value(&model.playback_quality),
            auto_play: model.auto_play,
            show_subtitles: model.show_subtitles,
            subtitle_size: SubtitleSize::from_tag(&model.subtitle_size),
            parental_control: ParentalControl {
                enabled: model.parental_control_enabled,
                pin: model.parental_control_pin,
                blocked_categories: decode_string_list(&model.blocked_categories),
                max_rating: model.max_rating,
            },
            tmdb_api_key: model.tmdb_api_key,
        }
    }

    fn settings_model(settings: &AppSettings) -> user_settings::ActiveModel {
        user_settings::ActiveModel {
            id: Set(SINGLETON_ID),
            theme: Set(settings.theme.as_str().to_string()),
            playback_quality: Set(settings.playback_quality.value().to_string()),
            auto_play: Set(settings.auto_play),
            show_subtitles: Set(settings.show_subtitles),
            subtitle_size: Set(settings.subtitle_size.as_str().to_string()),
            parental_control_enabled: Set(settings.parental_control.enabled),
            parental_control_pin: Set(settings.parental_control.pin.clone()),
            blocked_categories: Set(encode_string_list(
                &settings.parental_control.blocked_categories,
            )),
            max_rating: Set(settings.parental_control.max_rating.clone()),
            tmdb_api_key: Set(settings.tmdb_api_key.clone()),
        }
    }

    pub async fn get_settings(&self) -> Result<Option<AppSettings>> {
        let row = UserSettings::find_by_id(SINGLETON_ID).one(&self.conn).await?;
        Ok(row.map(Self::map_settings))
    }

    pub async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        UserSettings::insert(Self::settings_model(settings))
            .on_conflict(
                OnConflict::column(user_settings::Column::Id)
                    .update_columns([
                        user_settings::Column::Theme,
                        user_settings::Column::PlaybackQuality,
                        user_settings::Column::AutoPlay,
                        user_settings::Column::ShowSubtitles,
                        user_settings::Column::SubtitleSize,
                        user_settings::Column::ParentalControlEnabled,
                        user_settings::Column::ParentalControlPin,
                        user_settings::Column::BlockedCategories,
                        user_settings::Column::MaxRating,
                        user_settings::Column::TmdbApiKey,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn get_credentials(&self) -> Result<Option<Credentials>> {
        let row = UserCredentials::find_by_id(SINGLETON_ID).one(&self.conn).await?;
        Ok(row.map(|model: user_credentials::Model| Credentials {
            server_url: model.server_url,
            username: model.username,
            password: model.password,
            port: model.port,
        }))
    }

    /// Stores the connection details and stamps the login time.
    pub async fn save_credentials(&self, credentials: &Credentials) -> Result<()> {
        let model = user_credentials::ActiveModel {
            id: Set(SINGLETON_ID),
            server_url: Set(credentials.server_url.clone()),
            username: Set(credentials.username.clone()),
            password: Set(credentials.password.clone()),
            port: Set(credentials.port.clone()),
            last_login: Set(chrono::Utc::now().timestamp_millis()),
        };
        UserCredentials::insert(model)
            .on_conflict(
                OnConflict::column(user_credentials::Column::Id)
                    .update_columns([
                        user_credentials::Column::ServerUrl,
                        user_credentials::Column::Username,
                        user_credentials::Column::Password,
                        user_credentials::Column::Port,
                        user_credentials::Column::LastLogin,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn delete_credentials(&self) -> Result<()> {
        UserCredentials::delete_many().exec(&self.conn).await?;
        Ok(())
    }
}
