//! Xtream-Codes provider client.
//!
//! Every call goes through `player_api.php` with the account credentials as
//! query parameters; playback and catch-up URLs are plain path templates
//! built by the free functions at the bottom of this module.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{Category, Channel, Episode, EpgProgram, Movie, Season, TvSeries};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_EXTENSION: &str = "ts";
const DEFAULT_CATCHUP_DURATION_SECS: i64 = 3600;
const DEFAULT_SHORT_EPG_LIMIT: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user_info: UserInfo,
    pub server_info: ServerInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub password: String,
    pub message: String,
    pub auth: i32,
    pub status: String,
    pub exp_date: String,
    pub is_trial: String,
    pub active_cons: String,
    pub created_at: String,
    pub max_connections: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerInfo {
    pub url: String,
    pub port: String,
    pub https_port: String,
    pub server_protocol: String,
    pub rtmp_port: String,
    pub timezone: String,
    pub timestamp_now: i64,
    pub time_now: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamCategory {
    pub category_id: String,
    pub category_name: String,
    pub parent_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiveStream {
    pub num: i32,
    pub name: String,
    pub stream_type: String,
    pub stream_id: i32,
    pub stream_icon: String,
    pub epg_channel_id: String,
    pub added: String,
    pub category_id: String,
    pub custom_sid: String,
    pub tv_archive: i32,
    pub direct_source: String,
    pub tv_archive_duration: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VodStream {
    pub num: i32,
    pub name: String,
    pub stream_type: String,
    pub stream_id: i32,
    pub stream_icon: String,
    pub rating: String,
    pub rating_5based: f64,
    pub added: String,
    pub category_id: String,
    pub container_extension: String,
    pub custom_sid: String,
    pub direct_source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VodInfo {
    pub info: VodDetails,
    pub movie_data: MovieData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VodDetails {
    pub kinopoisk_url: String,
    pub tmdb_id: String,
    pub name: String,
    pub o_name: String,
    pub cover_big: String,
    pub movie_image: String,
    #[serde(rename = "releasedate")]
    pub release_date: String,
    pub episode_run_time: String,
    pub youtube_trailer: String,
    pub director: String,
    pub actors: String,
    pub cast: String,
    pub description: String,
    pub plot: String,
    pub age: String,
    pub country: String,
    pub genre: String,
    pub rating: String,
    pub rating_5based: f64,
    pub duration_secs: i32,
    pub duration: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieData {
    pub stream_id: i32,
    pub name: String,
    pub added: String,
    pub category_id: String,
    pub container_extension: String,
    pub custom_sid: String,
    pub direct_source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Series {
    pub num: i32,
    pub name: String,
    pub series_id: i32,
    pub cover: String,
    pub plot: String,
    pub cast: String,
    pub director: String,
    pub genre: String,
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub last_modified: String,
    pub rating: String,
    pub rating_5based: f64,
    pub backdrop_path: Vec<String>,
    pub youtube_trailer: String,
    pub episode_run_time: String,
    pub category_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesInfo {
    pub seasons: Vec<SeriesSeason>,
    pub info: SeriesDetails,
    /// Episode lists keyed by season number rendered as a string.
    pub episodes: HashMap<String, Vec<SeriesEpisode>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesDetails {
    pub name: String,
    pub cover: String,
    pub plot: String,
    pub cast: String,
    pub director: String,
    pub genre: String,
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    pub last_modified: String,
    pub rating: String,
    pub rating_5based: f64,
    pub backdrop_path: Vec<String>,
    pub youtube_trailer: String,
    pub episode_run_time: String,
    pub category_id: String,
    pub tmdb_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesSeason {
    pub air_date: String,
    pub episode_count: i32,
    pub id: i32,
    pub name: String,
    pub overview: String,
    pub poster_path: String,
    pub season_number: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesEpisode {
    pub id: String,
    pub episode_num: i32,
    pub title: String,
    pub container_extension: String,
    pub info: EpisodeDetails,
    pub custom_sid: String,
    pub added: String,
    pub season: i32,
    pub direct_source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeDetails {
    pub tmdb_id: String,
    #[serde(rename = "releasedate")]
    pub release_date: String,
    pub plot: String,
    pub duration_secs: i32,
    pub duration: String,
    pub movie_image: String,
    pub rating: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpgListing {
    pub id: String,
    pub epg_id: String,
    pub title: String,
    pub lang: String,
    pub start: String,
    pub end: String,
    pub description: String,
    pub channel_id: String,
    /// Unix seconds.
    pub start_timestamp: i64,
    /// Unix seconds.
    pub stop_timestamp: i64,
}

pub struct XtreamClient {
    client: Client,
    server_url: String,
    username: String,
    password: String,
}

impl XtreamClient {
    #[must_use]
    pub fn new(server_url: &str, username: &str, password: &str) -> Self {
        let client = Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    fn base_query(&self) -> String {
        format!(
            "{}/player_api.php?username={}&password={}",
            self.server_url,
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password)
        )
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}&action={}", self.base_query(), action)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        debug!("Xtream request: {}", what);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Xtream API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }

    /// Credential handshake; the provider replies with account and server
    /// details when the call carries no `action` parameter.
    pub async fn authenticate(&self) -> Result<AuthResponse> {
        self.fetch(&self.base_query(), "authenticate").await
    }

    pub async fn live_categories(&self) -> Result<Vec<StreamCategory>> {
        self.fetch(&self.action_url("get_live_categories"), "get_live_categories")
            .await
    }

    pub async fn live_streams(&self, category_id: Option<&str>) -> Result<Vec<LiveStream>> {
        let mut url = self.action_url("get_live_streams");
        if let Some(id) = category_id {
            url.push_str(&format!("&category_id={id}"));
        }
        self.fetch(&url, "get_live_streams").await
    }

    pub async fn vod_categories(&self) -> Result<Vec<StreamCategory>> {
        self.fetch(&self.action_url("get_vod_categories"), "get_vod_categories")
            .await
    }

    pub async fn vod_streams(&self, category_id: Option<&str>) -> Result<Vec<VodStream>> {
        let mut url = self.action_url("get_vod_streams");
        if let Some(id) = category_id {
            url.push_str(&format!("&category_id={id}"));
        }
        self.fetch(&url, "get_vod_streams").await
    }

    pub async fn vod_info(&self, vod_id: i32) -> Result<VodInfo> {
        let url = format!("{}&vod_id={}", self.action_url("get_vod_info"), vod_id);
        self.fetch(&url, "get_vod_info").await
    }

    pub async fn series_categories(&self) -> Result<Vec<StreamCategory>> {
        self.fetch(
            &self.action_url("get_series_categories"),
            "get_series_categories",
        )
        .await
    }

    pub async fn series(&self, category_id: Option<&str>) -> Result<Vec<Series>> {
        let mut url = self.action_url("get_series");
        if let Some(id) = category_id {
            url.push_str(&format!("&category_id={id}"));
        }
        self.fetch(&url, "get_series").await
    }

    pub async fn series_info(&self, series_id: i32) -> Result<SeriesInfo> {
        let url = format!("{}&series_id={}", self.action_url("get_series_info"), series_id);
        self.fetch(&url, "get_series_info").await
    }

    /// Upcoming programme listings for one stream, keyed by the provider
    /// under `"epg_listings"`.
    pub async fn short_epg(
        &self,
        stream_id: i32,
        limit: Option<u32>,
    ) -> Result<HashMap<String, Vec<EpgListing>>> {
        let url = format!(
            "{}&stream_id={}&limit={}",
            self.action_url("get_short_epg"),
            stream_id,
            limit.unwrap_or(DEFAULT_SHORT_EPG_LIMIT)
        );
        self.fetch(&url, "get_short_epg").await
    }

    /// Full programme guide as the raw XMLTV document.
    pub async fn full_epg_xml(&self) -> Result<String> {
        let url = format!(
            "{}/xmltv.php?username={}&password={}",
            self.server_url,
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password)
        );
        debug!("Xtream request: xmltv");
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow::anyhow!("Xtream API error: {}", status));
        }

        Ok(response.text().await?)
    }
}

/// Playback URL for a stream. Unrecognized kinds fall back to the live
/// template; the extension defaults to "ts".
#[must_use]
pub fn build_stream_url(
    server_url: &str,
    username: &str,
    password: &str,
    stream_id: i32,
    kind: &str,
    extension: Option<&str>,
) -> String {
    let server = server_url.trim_end_matches('/');
    let ext = extension.unwrap_or(DEFAULT_EXTENSION);

    match kind {
        "movie" => format!("{server}/movie/{username}/{password}/{stream_id}.{ext}"),
        "series" => format!("{server}/series/{username}/{password}/{stream_id}.{ext}"),
        _ => format!("{server}/{username}/{password}/{stream_id}.{ext}"),
    }
}

/// Catch-up URL for an archived live stream. `start` is unix seconds;
/// the window defaults to one hour.
#[must_use]
pub fn build_catchup_url(
    server_url: &str,
    username: &str,
    password: &str,
    stream_id: i32,
    start: i64,
    duration_secs: Option<i64>,
) -> String {
    let server = server_url.trim_end_matches('/');
    let duration = duration_secs.unwrap_or(DEFAULT_CATCHUP_DURATION_SECS);
    format!("{server}/timeshift/{username}/{password}/{duration}/{start}/{stream_id}.ts")
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[must_use]
pub fn map_live_stream(
    stream: LiveStream,
    server_url: &str,
    username: &str,
    password: &str,
    category_name: &str,
) -> Channel {
    let stream_url = build_stream_url(
        server_url,
        username,
        password,
        stream.stream_id,
        "live",
        None,
    );

    Channel {
        id: stream.stream_id,
        name: stream.name,
        stream_url,
        icon_url: non_empty(stream.stream_icon),
        category_id: stream.category_id,
        category_name: category_name.to_string(),
        epg_channel_id: non_empty(stream.epg_channel_id),
        has_archive: stream.tv_archive == 1,
        archive_duration: stream.tv_archive_duration,
        is_favorite: false,
    }
}

#[must_use]
pub fn map_vod_stream(
    stream: VodStream,
    server_url: &str,
    username: &str,
    password: &str,
    category_name: &str,
) -> Movie {
    let stream_url = build_stream_url(
        server_url,
        username,
        password,
        stream.stream_id,
        "movie",
        Some(&stream.container_extension),
    );

    Movie {
        id: stream.stream_id,
        name: stream.name,
        stream_url,
        poster_url: non_empty(stream.stream_icon),
        backdrop_url: None,
        category_id: stream.category_id,
        category_name: category_name.to_string(),
        rating: stream.rating_5based,
        year: None,
        duration: None,
        description: None,
        genre: None,
        director: None,
        cast: None,
        tmdb_id: None,
        trailer_url: None,
        is_favorite: false,
    }
}

#[must_use]
pub fn map_vod_info(
    vod: VodInfo,
    server_url: &str,
    username: &str,
    password: &str,
    category_name: &str,
) -> Movie {
    let stream_url = build_stream_url(
        server_url,
        username,
        password,
        vod.movie_data.stream_id,
        "movie",
        Some(&vod.movie_data.container_extension),
    );
    let details = vod.info;

    Movie {
        id: vod.movie_data.stream_id,
        name: details.name,
        stream_url,
        poster_url: non_empty(details.movie_image),
        backdrop_url: non_empty(details.cover_big),
        category_id: vod.movie_data.category_id,
        category_name: category_name.to_string(),
        rating: details.rating_5based,
        year: Some(details.release_date),
        duration: Some(details.duration),
        description: non_empty(details.plot),
        genre: non_empty(details.genre),
        director: non_empty(details.director),
        cast: non_empty(details.cast),
        tmdb_id: non_empty(details.tmdb_id),
        trailer_url: non_empty(details.youtube_trailer),
        is_favorite: false,
    }
}

#[must_use]
pub fn map_series(series: Series, category_name: &str) -> TvSeries {
    TvSeries {
        id: series.series_id,
        name: series.name,
        poster_url: non_empty(series.cover),
        backdrop_url: series.backdrop_path.into_iter().next(),
        category_id: series.category_id,
        category_name: category_name.to_string(),
        rating: series.rating_5based,
        year: Some(series.release_date),
        description: non_empty(series.plot),
        genre: non_empty(series.genre),
        director: non_empty(series.director),
        cast: non_empty(series.cast),
        tmdb_id: None,
        trailer_url: non_empty(series.youtube_trailer),
        total_seasons: 0,
        total_episodes: 0,
        is_favorite: false,
    }
}

/// Detail payloads carry no series id; the caller fills it in from the
/// listing it came from.
#[must_use]
pub fn map_series_info(info: SeriesInfo, category_name: &str) -> TvSeries {
    let total_seasons = info.seasons.len() as i32;
    let total_episodes = info.episodes.values().map(Vec::len).sum::<usize>() as i32;
    let details = info.info;

    TvSeries {
        id: 0,
        name: details.name,
        poster_url: non_empty(details.cover),
        backdrop_url: details.backdrop_path.into_iter().next(),
        category_id: details.category_id,
        category_name: category_name.to_string(),
        rating: details.rating_5based,
        year: Some(details.release_date),
        description: non_empty(details.plot),
        genre: non_empty(details.genre),
        director: non_empty(details.director),
        cast: non_empty(details.cast),
        tmdb_id: non_empty(details.tmdb_id),
        trailer_url: non_empty(details.youtube_trailer),
        total_seasons,
        total_episodes,
        is_favorite: false,
    }
}

#[must_use]
pub fn map_season(season: SeriesSeason, series_id: i32) -> Season {
    Season {
        id: season.id,
        series_id,
        season_number: season.season_number,
        name: season.name,
        overview: non_empty(season.overview),
        poster_url: non_empty(season.poster_path),
        episode_count: season.episode_count,
        air_date: Some(season.air_date),
    }
}

#[must_use]
pub fn map_episode(
    episode: SeriesEpisode,
    server_url: &str,
    username: &str,
    password: &str,
    series_id: i32,
) -> Episode {
    // Episode ids come over the wire as strings; the playback template
    // needs the numeric form.
    let numeric_id = episode.id.parse().unwrap_or(0);
    let stream_url = build_stream_url(
        server_url,
        username,
        password,
        numeric_id,
        "series",
        Some(&episode.container_extension),
    );
    let details = episode.info;

    Episode {
        id: episode.id,
        series_id,
        season_number: episode.season,
        episode_number: episode.episode_num,
        title: episode.title,
        stream_url,
        overview: non_empty(details.plot),
        still_url: non_empty(details.movie_image),
        duration: Some(details.duration),
        air_date: Some(details.release_date),
        rating: details.rating.parse().unwrap_or(0.0),
        tmdb_id: non_empty(details.tmdb_id),
    }
}

#[must_use]
pub fn map_category(category: StreamCategory) -> Category {
    Category {
        id: category.category_id,
        name: category.category_name,
        parent_id: category.parent_id,
    }
}

#[must_use]
pub fn map_epg_listing(listing: EpgListing) -> EpgProgram {
    EpgProgram {
        id: listing.id,
        channel_id: listing.channel_id,
        title: listing.title,
        description: non_empty(listing.description),
        start_time: listing.start_timestamp * 1000,
        end_time: listing.stop_timestamp * 1000,
        language: non_empty(listing.lang),
    }
}
