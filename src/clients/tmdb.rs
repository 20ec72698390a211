//! TMDB metadata client.
//!
//! Catalog rows coming from the provider are sparse; these lookups fill in
//! artwork, synopsis and ratings. The `enrich_*` functions apply a TMDB
//! record on top of an existing row, falling back to whatever the row
//! already had.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{Movie, TvSeries};

const TMDB_API: &str = "https://api.themoviedb.org/3";
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";
pub const DEFAULT_LANGUAGE: &str = "es-ES";

pub const POSTER_SIZE_W185: &str = "w185";
pub const POSTER_SIZE_W342: &str = "w342";
pub const POSTER_SIZE_W500: &str = "w500";
pub const POSTER_SIZE_W780: &str = "w780";
pub const POSTER_SIZE_ORIGINAL: &str = "original";

pub const BACKDROP_SIZE_W300: &str = "w300";
pub const BACKDROP_SIZE_W780: &str = "w780";
pub const BACKDROP_SIZE_W1280: &str = "w1280";
pub const BACKDROP_SIZE_ORIGINAL: &str = "original";

pub const PROFILE_SIZE_W45: &str = "w45";
pub const PROFILE_SIZE_W185: &str = "w185";
pub const PROFILE_SIZE_H632: &str = "h632";
pub const PROFILE_SIZE_ORIGINAL: &str = "original";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpokenLanguage {
    pub iso_639_1: String,
    pub name: String,
    pub english_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    pub id: i32,
    pub imdb_id: Option<String>,
    pub title: String,
    pub original_title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<i32>,
    pub vote_average: f64,
    pub vote_count: i32,
    pub popularity: f64,
    pub adult: bool,
    pub genres: Vec<Genre>,
    pub production_countries: Vec<ProductionCountry>,
    pub spoken_languages: Vec<SpokenLanguage>,
    pub tagline: Option<String>,
    pub status: String,
    pub budget: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvDetails {
    pub id: i32,
    pub name: String,
    pub original_name: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub vote_average: f64,
    pub vote_count: i32,
    pub popularity: f64,
    pub genres: Vec<Genre>,
    pub production_countries: Vec<ProductionCountry>,
    pub spoken_languages: Vec<SpokenLanguage>,
    pub tagline: Option<String>,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub number_of_episodes: i32,
    pub number_of_seasons: i32,
    pub episode_run_time: Vec<i32>,
    pub seasons: Vec<TvSeason>,
    pub networks: Vec<Network>,
    pub created_by: Vec<Creator>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvSeason {
    pub id: i32,
    pub name: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub season_number: i32,
    pub episode_count: i32,
    pub air_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Network {
    pub id: i32,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Creator {
    pub id: i32,
    pub name: String,
    pub profile_path: Option<String>,
    pub credit_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credits {
    pub id: i32,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub id: i32,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
    pub order: i32,
    pub cast_id: i32,
    pub credit_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub id: i32,
    pub name: String,
    pub job: String,
    pub department: String,
    pub profile_path: Option<String>,
    pub credit_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideosResponse {
    pub id: i32,
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub official: bool,
    pub published_at: String,
    pub size: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesResponse {
    pub id: i32,
    pub backdrops: Vec<Image>,
    pub posters: Vec<Image>,
    pub logos: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub aspect_ratio: f64,
    pub file_path: String,
    pub height: i32,
    pub width: i32,
    pub iso_639_1: Option<String>,
    pub vote_average: f64,
    pub vote_count: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse<T> {
    pub page: i32,
    pub results: Vec<T>,
    pub total_pages: i32,
    pub total_results: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieSearchResult {
    pub id: i32,
    pub title: String,
    pub original_title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub vote_count: i32,
    pub popularity: f64,
    pub adult: bool,
    pub genre_ids: Vec<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvSearchResult {
    pub id: i32,
    pub name: String,
    pub original_name: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: f64,
    pub vote_count: i32,
    pub popularity: f64,
    pub genre_ids: Vec<i32>,
    pub origin_country: Vec<String>,
    pub original_language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    pub images: ImageConfiguration,
    pub change_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfiguration {
    pub base_url: String,
    pub secure_base_url: String,
    pub backdrop_sizes: Vec<String>,
    pub logo_sizes: Vec<String>,
    pub poster_sizes: Vec<String>,
    pub profile_sizes: Vec<String>,
    pub still_sizes: Vec<String>,
}

pub struct TmdbClient {
    client: Client,
    api_key: String,
    language: String,
}

impl TmdbClient {
    #[must_use]
    pub fn new(api_key: &str) -> Self {
        Self::with_language(api_key, DEFAULT_LANGUAGE)
    }

    #[must_use]
    pub fn with_language(api_key: &str, language: &str) -> Self {
        let client = Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.to_string(),
            language: language.to_string(),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        debug!("TMDB request: {}", what);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TMDB API error: {} - {}", status, body));
        }

        Ok(response.json().await?)
    }

    /// Point lookup variant; a 404 means TMDB has no record for that id.
    async fn fetch_optional<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<Option<T>> {
        debug!("TMDB request: {}", what);
        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TMDB API error: {} - {}", status, body));
        }

        Ok(Some(response.json().await?))
    }

    pub async fn configuration(&self) -> Result<Configuration> {
        let url = format!("{}/configuration?api_key={}", TMDB_API, self.api_key);
        self.fetch(&url, "configuration").await
    }

    pub async fn movie_details(&self, movie_id: i32) -> Result<Option<MovieDetails>> {
        let url = format!(
            "{}/movie/{}?api_key={}&language={}",
            TMDB_API, movie_id, self.api_key, self.language
        );
        self.fetch_optional(&url, "movie details").await
    }

    pub async fn movie_credits(&self, movie_id: i32) -> Result<Option<Credits>> {
        let url = format!(
            "{}/movie/{}/credits?api_key={}",
            TMDB_API, movie_id, self.api_key
        );
        self.fetch_optional(&url, "movie credits").await
    }

    pub async fn movie_videos(&self, movie_id: i32) -> Result<Option<VideosResponse>> {
        let url = format!(
            "{}/movie/{}/videos?api_key={}&language={}",
            TMDB_API, movie_id, self.api_key, self.language
        );
        self.fetch_optional(&url, "movie videos").await
    }

    pub async fn movie_images(&self, movie_id: i32) -> Result<Option<ImagesResponse>> {
        let url = format!(
            "{}/movie/{}/images?api_key={}",
            TMDB_API, movie_id, self.api_key
        );
        self.fetch_optional(&url, "movie images").await
    }

    pub async fn tv_details(&self, tv_id: i32) -> Result<Option<TvDetails>> {
        let url = format!(
            "{}/tv/{}?api_key={}&language={}",
            TMDB_API, tv_id, self.api_key, self.language
        );
        self.fetch_optional(&url, "tv details").await
    }

    pub async fn tv_credits(&self, tv_id: i32) -> Result<Option<Credits>> {
        let url = format!("{}/tv/{}/credits?api_key={}", TMDB_API, tv_id, self.api_key);
        self.fetch_optional(&url, "tv credits").await
    }

    pub async fn tv_videos(&self, tv_id: i32) -> Result<Option<VideosResponse>> {
        let url = format!(
            "{}/tv/{}/videos?api_key={}&language={}",
            TMDB_API, tv_id, self.api_key, self.language
        );
        self.fetch_optional(&url, "tv videos").await
    }

    pub async fn tv_images(&self, tv_id: i32) -> Result<Option<ImagesResponse>> {
        let url = format!("{}/tv/{}/images?api_key={}", TMDB_API, tv_id, self.api_key);
        self.fetch_optional(&url, "tv images").await
    }

    pub async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> Result<SearchResponse<MovieSearchResult>> {
        let url = format!(
            "{}/search/movie?api_key={}&query={}&language={}&page={}&include_adult=false",
            TMDB_API,
            self.api_key,
            urlencoding::encode(query),
            self.language,
            page
        );
        self.fetch(&url, "search movies").await
    }

    pub async fn search_tv(&self, query: &str, page: u32) -> Result<SearchResponse<TvSearchResult>> {
        let url = format!(
            "{}/search/tv?api_key={}&query={}&language={}&page={}&include_adult=false",
            TMDB_API,
            self.api_key,
            urlencoding::encode(query),
            self.language,
            page
        );
        self.fetch(&url, "search tv").await
    }

    pub async fn popular_movies(&self, page: u32) -> Result<SearchResponse<MovieSearchResult>> {
        let url = format!(
            "{}/movie/popular?api_key={}&language={}&page={}",
            TMDB_API, self.api_key, self.language, page
        );
        self.fetch(&url, "popular movies").await
    }

    pub async fn top_rated_movies(&self, page: u32) -> Result<SearchResponse<MovieSearchResult>> {
        let url = format!(
            "{}/movie/top_rated?api_key={}&language={}&page={}",
            TMDB_API, self.api_key, self.language, page
        );
        self.fetch(&url, "top rated movies").await
    }

    pub async fn popular_tv(&self, page: u32) -> Result<SearchResponse<TvSearchResult>> {
        let url = format!(
            "{}/tv/popular?api_key={}&language={}&page={}",
            TMDB_API, self.api_key, self.language, page
        );
        self.fetch(&url, "popular tv").await
    }

    pub async fn top_rated_tv(&self, page: u32) -> Result<SearchResponse<TvSearchResult>> {
        let url = format!(
            "{}/tv/top_rated?api_key={}&language={}&page={}",
            TMDB_API, self.api_key, self.language, page
        );
        self.fetch(&url, "top rated tv").await
    }
}

#[must_use]
pub fn build_image_url(path: Option<&str>, size: &str) -> Option<String> {
    path.map(|p| format!("{IMAGE_BASE_URL}{size}{p}"))
}

#[must_use]
pub fn build_poster_url(path: Option<&str>) -> Option<String> {
    build_image_url(path, POSTER_SIZE_W500)
}

#[must_use]
pub fn build_backdrop_url(path: Option<&str>) -> Option<String> {
    build_image_url(path, BACKDROP_SIZE_W1280)
}

#[must_use]
pub fn build_profile_url(path: Option<&str>) -> Option<String> {
    build_image_url(path, PROFILE_SIZE_W185)
}

#[must_use]
pub fn youtube_trailer_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={key}")
}

#[must_use]
pub fn youtube_thumbnail_url(key: &str) -> String {
    format!("https://img.youtube.com/vi/{key}/maxresdefault.jpg")
}

fn join_genres(genres: &[Genre]) -> Option<String> {
    let joined = genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() { None } else { Some(joined) }
}

fn first_four(date: &str) -> String {
    date.chars().take(4).collect()
}

/// Lays a TMDB record over a provider movie row. Each field is replaced
/// only when TMDB actually has a value; otherwise the row keeps what it had.
#[must_use]
pub fn enrich_movie(movie: &Movie, details: &MovieDetails) -> Movie {
    Movie {
        poster_url: build_poster_url(details.poster_path.as_deref())
            .or_else(|| movie.poster_url.clone()),
        backdrop_url: build_backdrop_url(details.backdrop_path.as_deref())
            .or_else(|| movie.backdrop_url.clone()),
        description: details
            .overview
            .clone()
            .filter(|o| !o.is_empty())
            .or_else(|| movie.description.clone()),
        genre: join_genres(&details.genres).or_else(|| movie.genre.clone()),
        rating: if details.vote_average > 0.0 {
            details.vote_average
        } else {
            movie.rating
        },
        year: details
            .release_date
            .as_deref()
            .map(first_four)
            .or_else(|| movie.year.clone()),
        duration: details
            .runtime
            .map(|r| format!("{r} min"))
            .or_else(|| movie.duration.clone()),
        ..movie.clone()
    }
}

/// Series variant of [`enrich_movie`]. Season and episode totals always
/// come from TMDB, which knows them better than the provider listing.
#[must_use]
pub fn enrich_series(series: &TvSeries, details: &TvDetails) -> TvSeries {
    TvSeries {
        poster_url: build_poster_url(details.poster_path.as_deref())
            .or_else(|| series.poster_url.clone()),
        backdrop_url: build_backdrop_url(details.backdrop_path.as_deref())
            .or_else(|| series.backdrop_url.clone()),
        description: details
            .overview
            .clone()
            .filter(|o| !o.is_empty())
            .or_else(|| series.description.clone()),
        genre: join_genres(&details.genres).or_else(|| series.genre.clone()),
        rating: if details.vote_average > 0.0 {
            details.vote_average
        } else {
            series.rating
        },
        year: details
            .first_air_date
            .as_deref()
            .map(first_four)
            .or_else(|| series.year.clone()),
        total_seasons: details.number_of_seasons,
        total_episodes: details.number_of_episodes,
        ..series.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_concatenates_base_size_and_path() {
        assert_eq!(
            build_poster_url(Some("/abc.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(
            build_backdrop_url(Some("/b.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w1280/b.jpg")
        );
        assert_eq!(
            build_profile_url(Some("/p.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w185/p.jpg")
        );
    }

    #[test]
    fn missing_image_path_builds_nothing() {
        assert_eq!(build_image_url(None, "w500"), None);
    }

    #[test]
    fn youtube_urls() {
        assert_eq!(
            youtube_trailer_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            youtube_thumbnail_url("dQw4w9WgXcQ"),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }

    fn base_movie() -> Movie {
        Movie {
            id: 1,
            name: "Some Film".to_string(),
            stream_url: "http://h/movie/u/p/1.mkv".to_string(),
            poster_url: Some("http://provider/poster.jpg".to_string()),
            backdrop_url: None,
            category_id: "9".to_string(),
            category_name: "Drama".to_string(),
            rating: 3.6,
            year: Some("1999".to_string()),
            duration: Some("01:30:00".to_string()),
            description: Some("Provider blurb.".to_string()),
            genre: None,
            director: None,
            cast: None,
            tmdb_id: Some("603".to_string()),
            trailer_url: None,
            is_favorite: false,
        }
    }

    fn bare_details() -> MovieDetails {
        MovieDetails {
            id: 603,
            imdb_id: None,
            title: "Some Film".to_string(),
            original_title: "Some Film".to_string(),
            overview: None,
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            runtime: None,
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            adult: false,
            genres: vec![],
            production_countries: vec![],
            spoken_languages: vec![],
            tagline: None,
            status: "Released".to_string(),
            budget: 0,
            revenue: 0,
        }
    }

    #[test]
    fn enrichment_replaces_fields_tmdb_knows() {
        let details = MovieDetails {
            overview: Some("Better blurb.".to_string()),
            poster_path: Some("/p.jpg".to_string()),
            backdrop_path: Some("/b.jpg".to_string()),
            release_date: Some("2003-05-15".to_string()),
            runtime: Some(138),
            vote_average: 7.9,
            genres: vec![
                Genre { id: 18, name: "Drama".to_string() },
                Genre { id: 878, name: "Science Fiction".to_string() },
            ],
            ..bare_details()
        };

        let enriched = enrich_movie(&base_movie(), &details);
        assert_eq!(
            enriched.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/p.jpg")
        );
        assert_eq!(
            enriched.backdrop_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w1280/b.jpg")
        );
        assert_eq!(enriched.description.as_deref(), Some("Better blurb."));
        assert_eq!(enriched.genre.as_deref(), Some("Drama, Science Fiction"));
        assert_eq!(enriched.rating, 7.9);
        assert_eq!(enriched.year.as_deref(), Some("2003"));
        assert_eq!(enriched.duration.as_deref(), Some("138 min"));
        // Untouched provider fields survive.
        assert_eq!(enriched.stream_url, "http://h/movie/u/p/1.mkv");
        assert_eq!(enriched.category_name, "Drama");
    }

    #[test]
    fn enrichment_keeps_row_fields_when_tmdb_is_empty() {
        let enriched = enrich_movie(&base_movie(), &bare_details());
        assert_eq!(enriched.poster_url.as_deref(), Some("http://provider/poster.jpg"));
        assert_eq!(enriched.description.as_deref(), Some("Provider blurb."));
        assert_eq!(enriched.rating, 3.6);
        assert_eq!(enriched.year.as_deref(), Some("1999"));
        assert_eq!(enriched.duration.as_deref(), Some("01:30:00"));
        assert_eq!(enriched.genre, None);
    }

    #[test]
    fn empty_overview_does_not_clobber_description() {
        let details = MovieDetails {
            overview: Some(String::new()),
            ..bare_details()
        };
        let enriched = enrich_movie(&base_movie(), &details);
        assert_eq!(enriched.description.as_deref(), Some("Provider blurb."));
    }

    #[test]
    fn series_totals_always_come_from_tmdb() {
        let series = TvSeries {
            id: 31,
            name: "Some Show".to_string(),
            poster_url: None,
            backdrop_url: None,
            category_id: "12".to_string(),
            category_name: "Drama".to_string(),
            rating: 4.0,
            year: None,
            description: None,
            genre: None,
            director: None,
            cast: None,
            tmdb_id: Some("1396".to_string()),
            trailer_url: None,
            total_seasons: 2,
            total_episodes: 13,
            is_favorite: true,
        };
        let details = TvDetails {
            id: 1396,
            name: "Some Show".to_string(),
            original_name: "Some Show".to_string(),
            overview: None,
            poster_path: None,
            backdrop_path: None,
            first_air_date: Some("2008-01-20".to_string()),
            last_air_date: None,
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            genres: vec![],
            production_countries: vec![],
            spoken_languages: vec![],
            tagline: None,
            status: "Ended".to_string(),
            kind: "Scripted".to_string(),
            number_of_episodes: 62,
            number_of_seasons: 5,
            episode_run_time: vec![47],
            seasons: vec![],
            networks: vec![],
            created_by: vec![],
        };

        let enriched = enrich_series(&series, &details);
        assert_eq!(enriched.total_seasons, 5);
        assert_eq!(enriched.total_episodes, 62);
        assert_eq!(enriched.year.as_deref(), Some("2008"));
        // Ratings of zero never overwrite the provider score.
        assert_eq!(enriched.rating, 4.0);
        assert!(enriched.is_favorite);
    }
}
