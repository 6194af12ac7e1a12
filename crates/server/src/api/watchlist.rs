//! Watchlist API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use reel_core::{CatalogItem, ItemId, WatchlistStore};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub id: ItemId,
    /// False when an item with the same id was already saved.
    pub added: bool,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub id: ItemId,
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: ItemId,
    pub saved: bool,
}

/// GET /api/v1/watchlist
///
/// Saved items in the order they were added.
pub async fn list_watchlist(State(state): State<Arc<AppState>>) -> Json<Vec<CatalogItem>> {
    Json(state.watchlist().list())
}

/// POST /api/v1/watchlist
///
/// Save an item. Answers 201 when it was inserted, 200 when already present.
pub async fn add_to_watchlist(
    State(state): State<Arc<AppState>>,
    Json(item): Json<CatalogItem>,
) -> (StatusCode, Json<AddResponse>) {
    let id = item.id.clone();
    let added = state.watchlist().add(item);
    if added {
        info!("Saved {} to watchlist", id);
    }

    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(AddResponse { id, added }))
}

/// Resolve a path segment against the saved ids.
///
/// `/watchlist/7` names the numeric id 7, unless only a string id `"7"` is saved.
fn resolve_path_id(watchlist: &WatchlistStore, segment: &str) -> ItemId {
    let id = ItemId::from_path_segment(segment);
    if watchlist.contains(&id) {
        return id;
    }
    match id.as_text_alternative() {
        Some(text) if watchlist.contains(&text) => text,
        _ => id,
    }
}

/// DELETE /api/v1/watchlist/{id}
pub async fn remove_from_watchlist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<RemoveResponse> {
    let id = resolve_path_id(state.watchlist(), &id);
    let removed = state.watchlist().remove(&id);
    if removed {
        info!("Removed {} from watchlist", id);
    }
    Json(RemoveResponse { id, removed })
}

/// GET /api/v1/watchlist/{id}
pub async fn get_membership(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<MembershipResponse> {
    let id = resolve_path_id(state.watchlist(), &id);
    Json(MembershipResponse {
        saved: state.watchlist().contains(&id),
        id,
    })
}
