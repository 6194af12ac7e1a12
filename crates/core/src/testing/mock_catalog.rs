//! Mock catalog reader for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{
    CatalogError, CatalogPage, CatalogReader, Credits, MovieDetails, Season, ShowDetails, Video,
};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCatalogQuery {
    PopularMovies { page: u32 },
    UpcomingMovies { page: u32 },
    PopularShows { page: u32 },
    SimilarMovies { movie_id: u32 },
    Movie { movie_id: u32 },
    MovieCredits { movie_id: u32 },
    MovieVideos { movie_id: u32 },
    Show { show_id: u32 },
    ShowCredits { show_id: u32 },
    Season { show_id: u32, season_number: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Listing {
    PopularMovies,
    UpcomingMovies,
    PopularShows,
}

/// Mock implementation of the CatalogReader trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable listings and details
/// - Track queries for assertions
/// - Simulate failures
///
/// Listing pages that were never configured come back empty. Credits,
/// videos and similar movies of a configured movie default to empty; for an
/// unknown movie or show they fail with [`CatalogError::NotFound`].
#[derive(Debug)]
pub struct MockCatalogReader {
    /// Listing pages by (listing, page number).
    listings: Arc<RwLock<HashMap<(Listing, u32), CatalogPage>>>,
    /// Similar-movie pages by movie ID.
    similar: Arc<RwLock<HashMap<u32, CatalogPage>>>,
    movies: Arc<RwLock<HashMap<u32, MovieDetails>>>,
    movie_credits: Arc<RwLock<HashMap<u32, Credits>>>,
    movie_videos: Arc<RwLock<HashMap<u32, Vec<Video>>>>,
    shows: Arc<RwLock<HashMap<u32, ShowDetails>>>,
    show_credits: Arc<RwLock<HashMap<u32, Credits>>>,
    /// Seasons by (show_id, season_number).
    seasons: Arc<RwLock<HashMap<(u32, u32), Season>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl Default for MockCatalogReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalogReader {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            listings: Arc::new(RwLock::new(HashMap::new())),
            similar: Arc::new(RwLock::new(HashMap::new())),
            movies: Arc::new(RwLock::new(HashMap::new())),
            movie_credits: Arc::new(RwLock::new(HashMap::new())),
            movie_videos: Arc::new(RwLock::new(HashMap::new())),
            shows: Arc::new(RwLock::new(HashMap::new())),
            show_credits: Arc::new(RwLock::new(HashMap::new())),
            seasons: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    // =========================================================================
    // Listing Configuration
    // =========================================================================

    pub async fn set_popular_movies(&self, page: CatalogPage) {
        self.set_listing(Listing::PopularMovies, page).await;
    }

    pub async fn set_upcoming_movies(&self, page: CatalogPage) {
        self.set_listing(Listing::UpcomingMovies, page).await;
    }

    pub async fn set_popular_shows(&self, page: CatalogPage) {
        self.set_listing(Listing::PopularShows, page).await;
    }

    /// Set the similar-movies page of a movie.
    pub async fn set_similar_movies(&self, movie_id: u32, page: CatalogPage) {
        self.similar.write().await.insert(movie_id, page);
    }

    async fn set_listing(&self, listing: Listing, page: CatalogPage) {
        self.listings
            .write()
            .await
            .insert((listing, page.page), page);
    }

    // =========================================================================
    // Movie Configuration
    // =========================================================================

    /// Add movie details.
    pub async fn add_movie(&self, movie: MovieDetails) {
        self.movies.write().await.insert(movie.id, movie);
    }

    pub async fn set_movie_credits(&self, movie_id: u32, credits: Credits) {
        self.movie_credits.write().await.insert(movie_id, credits);
    }

    pub async fn set_movie_videos(&self, movie_id: u32, videos: Vec<Video>) {
        self.movie_videos.write().await.insert(movie_id, videos);
    }

    // =========================================================================
    // TV Configuration
    // =========================================================================

    /// Add show details.
    pub async fn add_show(&self, show: ShowDetails) {
        self.shows.write().await.insert(show.id, show);
    }

    pub async fn set_show_credits(&self, show_id: u32, credits: Credits) {
        self.show_credits.write().await.insert(show_id, credits);
    }

    /// Add a season of a show.
    pub async fn add_season(&self, show_id: u32, season: Season) {
        self.seasons
            .write()
            .await
            .insert((show_id, season.season_number), season);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    /// Take the pending error, or record the query.
    async fn begin(&self, query: RecordedCatalogQuery) -> Result<(), CatalogError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        self.queries.write().await.push(query);
        Ok(())
    }

    async fn listing(&self, listing: Listing, page: u32) -> CatalogPage {
        self.listings
            .read()
            .await
            .get(&(listing, page))
            .cloned()
            .unwrap_or(CatalogPage {
                page,
                ..CatalogPage::default()
            })
    }

    async fn require_movie(&self, movie_id: u32) -> Result<(), CatalogError> {
        if self.movies.read().await.contains_key(&movie_id) {
            Ok(())
        } else {
            Err(CatalogError::NotFound(format!("Movie {} not found", movie_id)))
        }
    }

    async fn require_show(&self, show_id: u32) -> Result<(), CatalogError> {
        if self.shows.read().await.contains_key(&show_id) {
            Ok(())
        } else {
            Err(CatalogError::NotFound(format!("Show {} not found", show_id)))
        }
    }
}

#[async_trait]
impl CatalogReader for MockCatalogReader {
    async fn popular_movies(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.begin(RecordedCatalogQuery::PopularMovies { page }).await?;
        Ok(self.listing(Listing::PopularMovies, page).await)
    }

    async fn upcoming_movies(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.begin(RecordedCatalogQuery::UpcomingMovies { page }).await?;
        Ok(self.listing(Listing::UpcomingMovies, page).await)
    }

    async fn similar_movies(&self, movie_id: u32) -> Result<CatalogPage, CatalogError> {
        self.begin(RecordedCatalogQuery::SimilarMovies { movie_id })
            .await?;
        self.require_movie(movie_id).await?;
        Ok(self
            .similar
            .read()
            .await
            .get(&movie_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn movie(&self, movie_id: u32) -> Result<MovieDetails, CatalogError> {
        self.begin(RecordedCatalogQuery::Movie { movie_id }).await?;
        self.movies
            .read()
            .await
            .get(&movie_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Movie {} not found", movie_id)))
    }

    async fn movie_credits(&self, movie_id: u32) -> Result<Credits, CatalogError> {
        self.begin(RecordedCatalogQuery::MovieCredits { movie_id })
            .await?;
        self.require_movie(movie_id).await?;
        Ok(self
            .movie_credits
            .read()
            .await
            .get(&movie_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn movie_videos(&self, movie_id: u32) -> Result<Vec<Video>, CatalogError> {
        self.begin(RecordedCatalogQuery::MovieVideos { movie_id })
            .await?;
        self.require_movie(movie_id).await?;
        Ok(self
            .movie_videos
            .read()
            .await
            .get(&movie_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn popular_shows(&self, page: u32) -> Result<CatalogPage, CatalogError> {
        self.begin(RecordedCatalogQuery::PopularShows { page }).await?;
        Ok(self.listing(Listing::PopularShows, page).await)
    }

    async fn show(&self, show_id: u32) -> Result<ShowDetails, CatalogError> {
        self.begin(RecordedCatalogQuery::Show { show_id }).await?;
        self.shows
            .read()
            .await
            .get(&show_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Show {} not found", show_id)))
    }

    async fn show_credits(&self, show_id: u32) -> Result<Credits, CatalogError> {
        self.begin(RecordedCatalogQuery::ShowCredits { show_id }).await?;
        self.require_show(show_id).await?;
        Ok(self
            .show_credits
            .read()
            .await
            .get(&show_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn season(&self, show_id: u32, season_number: u32) -> Result<Season, CatalogError> {
        self.begin(RecordedCatalogQuery::Season {
            show_id,
            season_number,
        })
        .await?;

        self.seasons
            .read()
            .await
            .get(&(show_id, season_number))
            .cloned()
            .ok_or_else(|| {
                CatalogError::NotFound(format!(
                    "Season {} of show {} not found",
                    season_number, show_id
                ))
            })
    }
}
