//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{
    CatalogPage, Credits, Episode, MovieDetails, Season, SeasonSummary, ShowDetails, Video,
};
use super::{CatalogError, CatalogReader};
use crate::metrics::{CATALOG_REQUESTS, CATALOG_REQUEST_DURATION};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Language sent with every request.
    #[serde(default = "default_language")]
    pub language: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout_secs() -> u32 {
    30
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        let base_url = config
            .base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            language: config.language,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the JSON body, mapping HTTP failures to `CatalogError`.
    ///
    /// `endpoint` labels the request in metrics, `what` names the resource in
    /// not-found errors.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
        page: Option<u32>,
        what: String,
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        let start = Instant::now();

        let result = self.fetch_inner(&url, page, what).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(CatalogError::NotFound(_)) => "not_found",
            Err(_) => "error",
        };
        CATALOG_REQUESTS
            .with_label_values(&[endpoint, outcome])
            .inc();
        CATALOG_REQUEST_DURATION
            .with_label_values(&[endpoint])
            .observe(start.elapsed().as_secs_f64());

        result
    }

    async fn fetch_inner<T: DeserializeOwned>(
        &self,
        url: &str,
        page: Option<u32>,
        what: String,
    ) -> Result<T, CatalogError> {
        debug!("TMDB request: url='{}', page={:?}", url, page);

        let mut request = self
            .client
            .get(url)
            .query(&[("api_key", &self.api_key), ("language", &self.language)]);

        if let Some(p) = page {
            request = request.query(&[("page", &p.to_string())]);
        }

        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::Unauthorized(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(what));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse {} response: {}", what, e))
        })
    }
}

#[async_trait]
impl CatalogReader for TmdbClient {
    async fn popular_movies(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.fetch(
            "movie_popular",
            "/movie/popular",
            Some(page),
            "Popular movies".to_string(),
        )
        .await
    }

    async fn upcoming_movies(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.fetch(
            "movie_upcoming",
            "/movie/upcoming",
            Some(page),
            "Upcoming movies".to_string(),
        )
        .await
    }

    async fn similar_movies(&self, movie_id: u32) -> Result<CatalogPage, CatalogError> {
        self.fetch(
            "movie_similar",
            &format!("/movie/{}/similar", movie_id),
            None,
            format!("Movies similar to {}", movie_id),
        )
        .await
    }

    async fn movie(&self, movie_id: u32) -> Result<MovieDetails, CatalogError> {
        let details: TmdbMovieDetails = self
            .fetch(
                "movie",
                &format!("/movie/{}", movie_id),
                None,
                format!("Movie ID {}", movie_id),
            )
            .await?;
        Ok(details.into())
    }

    async fn movie_credits(&self, movie_id: u32) -> Result<Credits, CatalogError> {
        self.fetch(
            "movie_credits",
            &format!("/movie/{}/credits", movie_id),
            None,
            format!("Credits for movie {}", movie_id),
        )
        .await
    }

    async fn movie_videos(&self, movie_id: u32) -> Result<Vec<Video>, CatalogError> {
        let videos: TmdbVideosResponse = self
            .fetch(
                "movie_videos",
                &format!("/movie/{}/videos", movie_id),
                None,
                format!("Videos for movie {}", movie_id),
            )
            .await?;
        Ok(videos.results)
    }

    async fn popular_shows(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.fetch(
            "tv_popular",
            "/tv/popular",
            Some(page),
            "Popular TV shows".to_string(),
        )
        .await
    }

    async fn show(&self, show_id: u32) -> Result<ShowDetails, CatalogError> {
        let details: TmdbTvDetails = self
            .fetch(
                "tv",
                &format!("/tv/{}", show_id),
                None,
                format!("TV series ID {}", show_id),
            )
            .await?;
        Ok(details.into())
    }

    async fn show_credits(&self, show_id: u32) -> Result<Credits, CatalogError> {
        self.fetch(
            "tv_credits",
            &format!("/tv/{}/credits", show_id),
            None,
            format!("Credits for TV series {}", show_id),
        )
        .await
    }

    async fn season(&self, show_id: u32, season_number: u32) -> Result<Season, CatalogError> {
        let details: TmdbSeasonDetails = self
            .fetch(
                "tv_season",
                &format!("/tv/{}/season/{}", show_id, season_number),
                None,
                format!("TV series {} season {}", show_id, season_number),
            )
            .await?;
        Ok(details.into())
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbVideosResponse {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    id: u32,
    title: String,
    original_title: Option<String>,
    original_language: Option<String>,
    tagline: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TmdbTvDetails {
    id: u32,
    name: String,
    original_name: Option<String>,
    original_language: Option<String>,
    overview: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    number_of_seasons: Option<u32>,
    number_of_episodes: Option<u32>,
    #[serde(default)]
    seasons: Vec<TmdbSeasonResult>,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    vote_average: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct TmdbSeasonResult {
    season_number: u32,
    name: Option<String>,
    episode_count: Option<u32>,
    air_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbSeasonDetails {
    season_number: u32,
    name: Option<String>,
    overview: Option<String>,
    air_date: Option<String>,
    poster_path: Option<String>,
    #[serde(default)]
    episodes: Vec<TmdbEpisodeResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbEpisodeResult {
    episode_number: u32,
    name: String,
    overview: Option<String>,
    runtime: Option<u32>,
    air_date: Option<String>,
    still_path: Option<String>,
    vote_average: Option<f32>,
}

// ============================================================================
// Conversions
// ============================================================================

impl From<TmdbMovieDetails> for MovieDetails {
    fn from(d: TmdbMovieDetails) -> Self {
        Self {
            id: d.id,
            title: d.title,
            original_title: d.original_title,
            original_language: d.original_language,
            tagline: d.tagline.filter(|t| !t.is_empty()),
            overview: d.overview,
            release_date: d.release_date,
            runtime_minutes: d.runtime,
            poster_path: d.poster_path,
            backdrop_path: d.backdrop_path,
            genres: d.genres.into_iter().map(|g| g.name).collect(),
            vote_average: d.vote_average,
            vote_count: d.vote_count.unwrap_or(0),
        }
    }
}

impl From<TmdbTvDetails> for ShowDetails {
    fn from(d: TmdbTvDetails) -> Self {
        Self {
            id: d.id,
            name: d.name,
            original_name: d.original_name,
            original_language: d.original_language,
            overview: d.overview,
            first_air_date: d.first_air_date,
            poster_path: d.poster_path,
            backdrop_path: d.backdrop_path,
            number_of_seasons: d.number_of_seasons.unwrap_or(0),
            number_of_episodes: d.number_of_episodes.unwrap_or(0),
            seasons: d.seasons.into_iter().map(|s| s.into()).collect(),
            genres: d.genres.into_iter().map(|g| g.name).collect(),
            vote_average: d.vote_average,
        }
    }
}

impl From<TmdbSeasonResult> for SeasonSummary {
    fn from(s: TmdbSeasonResult) -> Self {
        Self {
            season_number: s.season_number,
            name: s.name,
            episode_count: s.episode_count.unwrap_or(0),
            air_date: s.air_date,
            poster_path: s.poster_path,
        }
    }
}

impl From<TmdbSeasonDetails> for Season {
    fn from(d: TmdbSeasonDetails) -> Self {
        Self {
            season_number: d.season_number,
            name: d.name,
            overview: d.overview,
            air_date: d.air_date,
            poster_path: d.poster_path,
            episodes: d.episodes.into_iter().map(|e| e.into()).collect(),
        }
    }
}

impl From<TmdbEpisodeResult> for Episode {
    fn from(e: TmdbEpisodeResult) -> Self {
        Self {
            episode_number: e.episode_number,
            name: e.name,
            overview: e.overview,
            runtime_minutes: e.runtime,
            air_date: e.air_date,
            still_path: e.still_path,
            vote_average: e.vote_average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemId;

    fn config(api_key: &str) -> TmdbConfig {
        TmdbConfig {
            api_key: api_key.to_string(),
            base_url: None,
            language: default_language(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = TmdbClient::new(config(""));
        assert!(matches!(result, Err(CatalogError::NotConfigured(_))));
    }

    #[test]
    fn test_new_uses_default_base_url() {
        let client = TmdbClient::new(config("key")).unwrap();
        assert_eq!(client.base_url(), "https://api.themoviedb.org/3");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = TmdbClient::new(TmdbConfig {
            base_url: Some("http://localhost:9999/3/".to_string()),
            ..config("key")
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/3");
    }

    #[test]
    fn test_popular_page_parsing() {
        let body = r#"{
            "page": 1,
            "results": [
                {"id": 27205, "title": "Inception", "vote_average": 8.4, "adult": false},
                {"id": 157336, "title": "Interstellar"}
            ],
            "total_pages": 500,
            "total_results": 10000
        }"#;
        let page: CatalogPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 500);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].id, ItemId::Number(27205));
        assert_eq!(page.results[0].get("adult"), Some(&serde_json::json!(false)));
    }

    #[test]
    fn test_movie_details_conversion() {
        let body = r#"{
            "id": 603,
            "title": "The Matrix",
            "original_title": "The Matrix",
            "original_language": "en",
            "tagline": "",
            "release_date": "1999-03-30",
            "runtime": 136,
            "overview": "A computer hacker...",
            "poster_path": "/poster.jpg",
            "backdrop_path": null,
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "vote_average": 8.2,
            "vote_count": 25000
        }"#;
        let details: TmdbMovieDetails = serde_json::from_str(body).unwrap();
        let movie: MovieDetails = details.into();
        assert_eq!(movie.runtime_minutes, Some(136));
        assert_eq!(movie.genres, vec!["Action", "Science Fiction"]);
        assert!(movie.tagline.is_none());
        assert_eq!(movie.vote_count, 25000);
    }

    #[test]
    fn test_tv_details_conversion() {
        let body = r#"{
            "id": 1396,
            "name": "Breaking Bad",
            "first_air_date": "2008-01-20",
            "number_of_seasons": 5,
            "number_of_episodes": 62,
            "seasons": [
                {"season_number": 1, "name": "Season 1", "episode_count": 7, "air_date": "2008-01-20"},
                {"season_number": 2}
            ],
            "genres": [{"id": 18, "name": "Drama"}],
            "vote_average": 8.9
        }"#;
        let details: TmdbTvDetails = serde_json::from_str(body).unwrap();
        let show: ShowDetails = details.into();
        assert_eq!(show.id, 1396);
        assert_eq!(show.number_of_seasons, 5);
        assert_eq!(show.seasons.len(), 2);
        assert_eq!(show.seasons[0].episode_count, 7);
        assert_eq!(show.seasons[1].episode_count, 0);
        assert_eq!(show.genres, vec!["Drama"]);
    }

    #[test]
    fn test_season_details_conversion() {
        let body = r#"{
            "season_number": 1,
            "name": "Season 1",
            "episodes": [
                {"episode_number": 1, "name": "Pilot", "runtime": 58, "still_path": "/p.jpg"},
                {"episode_number": 2, "name": "Cat's in the Bag..."}
            ]
        }"#;
        let details: TmdbSeasonDetails = serde_json::from_str(body).unwrap();
        let season: Season = details.into();
        assert_eq!(season.episodes.len(), 2);
        assert_eq!(season.episodes[0].runtime_minutes, Some(58));
        assert!(season.episodes[1].runtime_minutes.is_none());
    }

    #[test]
    fn test_videos_and_credits_parsing() {
        let videos: TmdbVideosResponse = serde_json::from_str(
            r#"{"id": 603, "results": [{"key": "abc", "name": "Trailer", "site": "YouTube", "type": "Trailer"}]}"#,
        )
        .unwrap();
        assert_eq!(videos.results[0].video_type, "Trailer");
        assert!(!videos.results[0].official);

        let credits: Credits = serde_json::from_str(
            r#"{"id": 603, "cast": [{"id": 6384, "name": "Keanu Reeves", "character": "Neo", "order": 0}], "crew": []}"#,
        )
        .unwrap();
        assert_eq!(credits.cast[0].character.as_deref(), Some("Neo"));
    }
}
