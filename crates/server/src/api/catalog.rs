//! Catalog views: listings and details annotated with watchlist membership.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use reel_core::catalog::{
    dedup_by_id, filter_by_title, normalize_seasons, pick_trailer, top_cast, CastMember,
    CatalogError, CatalogItem, CatalogPage, CatalogReader, MediaType, MovieDetails, Season,
    SeasonSummary, ShowDetails,
};
use reel_core::ItemId;

use super::handlers::ErrorResponse;
use crate::state::AppState;

/// Cast members shown on a detail view.
const CAST_LIMIT: usize = 10;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListingParams {
    #[serde(default)]
    pub page: Option<u32>,
    /// Case-insensitive title filter applied to the fetched page.
    #[serde(default)]
    pub search: Option<String>,
}

impl ListingParams {
    fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// A catalog item with its watchlist membership.
#[derive(Debug, Serialize)]
pub struct SavedItem {
    pub item: CatalogItem,
    pub saved: bool,
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub results: Vec<SavedItem>,
}

#[derive(Debug, Serialize)]
pub struct MovieView {
    pub movie: MovieDetails,
    pub saved: bool,
    /// YouTube key of the first trailer.
    pub trailer_key: Option<String>,
    pub cast: Vec<CastMember>,
    pub similar: Vec<SavedItem>,
}

#[derive(Debug, Serialize)]
pub struct ShowView {
    pub show: ShowDetails,
    pub saved: bool,
    pub cast: Vec<CastMember>,
    pub seasons: Vec<SeasonSummary>,
}

// ============================================================================
// Helpers
// ============================================================================

fn require_catalog(state: &AppState) -> Result<&Arc<dyn CatalogReader>, ApiError> {
    state.catalog().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse::new("Catalog not configured"),
        )
    })
}

/// Map a catalog failure to a response status.
pub fn catalog_error(what: &str, error: CatalogError) -> ApiError {
    match error {
        CatalogError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(format!("{} not found", what)),
        ),
        CatalogError::NotConfigured(msg) => {
            (StatusCode::SERVICE_UNAVAILABLE, ErrorResponse::new(msg))
        }
        e => {
            warn!("Catalog request for {} failed: {}", what, e);
            (StatusCode::BAD_GATEWAY, ErrorResponse::new(e.to_string()))
        }
    }
}

fn annotate(state: &AppState, items: Vec<CatalogItem>) -> Vec<SavedItem> {
    let watchlist = state.watchlist();
    items
        .into_iter()
        .map(|item| SavedItem {
            saved: watchlist.contains(&item.id),
            item,
        })
        .collect()
}

fn listing(
    state: &AppState,
    page: CatalogPage,
    media_type: MediaType,
    search: Option<&str>,
) -> ListingResponse {
    let mut results = filter_by_title(dedup_by_id(page.results), search.unwrap_or(""));
    for item in &mut results {
        item.tag_media_type(media_type);
    }

    ListingResponse {
        page: page.page,
        total_pages: page.total_pages,
        total_results: page.total_results,
        results: annotate(state, results),
    }
}

/// Secondary data for a detail view. A failure degrades to the default.
fn or_default<T: Default>(what: &str, id: u32, result: Result<T, CatalogError>) -> T {
    result.unwrap_or_else(|e| {
        warn!("Failed to fetch {} for {}: {}", what, id, e);
        T::default()
    })
}

// ============================================================================
// Listing Handlers
// ============================================================================

/// GET /api/v1/movies/popular
pub async fn popular_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingResponse>, ApiError> {
    let catalog = require_catalog(&state)?;
    let page = catalog
        .popular_movies(params.page())
        .await
        .map_err(|e| catalog_error("Popular movies", e))?;

    Ok(Json(listing(
        &state,
        page,
        MediaType::Movie,
        params.search.as_deref(),
    )))
}

/// GET /api/v1/movies/upcoming
pub async fn upcoming_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingResponse>, ApiError> {
    let catalog = require_catalog(&state)?;
    let page = catalog
        .upcoming_movies(params.page())
        .await
        .map_err(|e| catalog_error("Upcoming movies", e))?;

    Ok(Json(listing(
        &state,
        page,
        MediaType::Movie,
        params.search.as_deref(),
    )))
}

/// GET /api/v1/tv/popular
pub async fn popular_shows(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingResponse>, ApiError> {
    let catalog = require_catalog(&state)?;
    let page = catalog
        .popular_shows(params.page())
        .await
        .map_err(|e| catalog_error("Popular shows", e))?;

    Ok(Json(listing(
        &state,
        page,
        MediaType::Tv,
        params.search.as_deref(),
    )))
}

// ============================================================================
// Detail Handlers
// ============================================================================

/// GET /api/v1/movies/{id}
///
/// Movie details with trailer, top cast and similar movies. Only the details
/// request is required; the others fall back to empty.
pub async fn movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<u32>,
) -> Result<Json<MovieView>, ApiError> {
    let catalog = require_catalog(&state)?;

    let (details, credits, videos, similar) = tokio::join!(
        catalog.movie(movie_id),
        catalog.movie_credits(movie_id),
        catalog.movie_videos(movie_id),
        catalog.similar_movies(movie_id),
    );

    let movie = details.map_err(|e| catalog_error(&format!("Movie {}", movie_id), e))?;
    let videos = or_default("videos", movie_id, videos);
    let credits = or_default("credits", movie_id, credits);
    let similar = or_default("similar movies", movie_id, similar);

    let mut similar = dedup_by_id(similar.results);
    for item in &mut similar {
        item.tag_media_type(MediaType::Movie);
    }

    Ok(Json(MovieView {
        saved: state.watchlist().contains(&ItemId::from(movie.id)),
        trailer_key: pick_trailer(&videos).map(|v| v.key.clone()),
        cast: top_cast(credits, CAST_LIMIT),
        similar: annotate(&state, similar),
        movie,
    }))
}

/// GET /api/v1/tv/{id}
pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(show_id): Path<u32>,
) -> Result<Json<ShowView>, ApiError> {
    let catalog = require_catalog(&state)?;

    let (details, credits) = tokio::join!(catalog.show(show_id), catalog.show_credits(show_id));

    let show = details.map_err(|e| catalog_error(&format!("Show {}", show_id), e))?;
    let credits = or_default("credits", show_id, credits);

    Ok(Json(ShowView {
        saved: state.watchlist().contains(&ItemId::from(show.id)),
        cast: top_cast(credits, CAST_LIMIT),
        seasons: normalize_seasons(&show),
        show,
    }))
}

/// GET /api/v1/tv/{id}/season/{season_number}
pub async fn season(
    State(state): State<Arc<AppState>>,
    Path((show_id, season_number)): Path<(u32, u32)>,
) -> Result<Json<Season>, ApiError> {
    let catalog = require_catalog(&state)?;
    catalog
        .season(show_id, season_number)
        .await
        .map(Json)
        .map_err(|e| {
            catalog_error(
                &format!("Season {} of show {}", season_number, show_id),
                e,
            )
        })
}
