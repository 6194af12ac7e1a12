//! Catalog reader: read-only access to the remote media-metadata API.
//!
//! Listings come back as opaque [`CatalogItem`]s so they can be saved to the
//! watchlist exactly as received. Detail endpoints return typed records.

mod item;
mod listing;
mod tmdb;
mod types;

pub use item::{CatalogItem, ItemId, MediaType};
pub use listing::{dedup_by_id, filter_by_title, normalize_seasons, pick_trailer, top_cast};
pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when reading from the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The API rejected the credential (401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Read-only access to movie and TV listings and details.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    // Movie listings

    /// Popular movies.
    async fn popular_movies(&self, page: u32) -> Result<CatalogPage, CatalogError>;

    /// Movies that are about to be released.
    async fn upcoming_movies(&self, page: u32) -> Result<CatalogPage, CatalogError>;

    /// Movies similar to the given one.
    async fn similar_movies(&self, movie_id: u32) -> Result<CatalogPage, CatalogError>;

    // Movie details

    async fn movie(&self, movie_id: u32) -> Result<MovieDetails, CatalogError>;

    async fn movie_credits(&self, movie_id: u32) -> Result<Credits, CatalogError>;

    /// Trailers, teasers and clips of a movie.
    async fn movie_videos(&self, movie_id: u32) -> Result<Vec<Video>, CatalogError>;

    // TV

    /// Popular TV shows.
    async fn popular_shows(&self, page: u32) -> Result<CatalogPage, CatalogError>;

    async fn show(&self, show_id: u32) -> Result<ShowDetails, CatalogError>;

    async fn show_credits(&self, show_id: u32) -> Result<Credits, CatalogError>;

    /// A season of a show, with its episodes.
    async fn season(&self, show_id: u32, season_number: u32) -> Result<Season, CatalogError>;
}
