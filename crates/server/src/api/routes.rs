use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{catalog, handlers, middleware::metrics_middleware, watchlist, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Movies
        .route("/movies/popular", get(catalog::popular_movies))
        .route("/movies/upcoming", get(catalog::upcoming_movies))
        .route("/movies/{id}", get(catalog::movie))
        // TV
        .route("/tv/popular", get(catalog::popular_shows))
        .route("/tv/{id}", get(catalog::show))
        .route("/tv/{id}/season/{season_number}", get(catalog::season))
        // Watchlist
        .route(
            "/watchlist",
            get(watchlist::list_watchlist).post(watchlist::add_to_watchlist),
        )
        .route(
            "/watchlist/{id}",
            get(watchlist::get_membership).delete(watchlist::remove_from_watchlist),
        )
        // Real-time watchlist updates
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
