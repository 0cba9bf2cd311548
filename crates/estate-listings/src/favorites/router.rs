use std::collections::BTreeSet;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};

use super::service::FavoriteToggle;
use crate::error::DomainError;
use crate::http::ApiState;
use crate::listings::{Listing, ListingId};

pub fn favorites_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/favorites", get(list_handler))
        .route(
            "/api/v1/favorites/:listing_id",
            post(add_handler).delete(remove_handler),
        )
        .route("/api/v1/favorites/:listing_id/toggle", post(toggle_handler))
        .with_state(state)
}

pub(crate) async fn list_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Listing>>, DomainError> {
    let caller = state.caller(&headers)?;
    let listings = state.favorites.list(&caller)?;
    Ok(Json(
        listings
            .into_iter()
            .map(|listing| state.assets.listing(listing))
            .collect(),
    ))
}

pub(crate) async fn add_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Json<BTreeSet<ListingId>>, DomainError> {
    let caller = state.caller(&headers)?;
    Ok(Json(state.favorites.add(&caller, &ListingId(listing_id))?))
}

pub(crate) async fn remove_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Json<BTreeSet<ListingId>>, DomainError> {
    let caller = state.caller(&headers)?;
    Ok(Json(state.favorites.remove(&caller, &ListingId(listing_id))?))
}

pub(crate) async fn toggle_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Json<FavoriteToggle>, DomainError> {
    let caller = state.caller(&headers)?;
    Ok(Json(state.favorites.toggle(&caller, &ListingId(listing_id))?))
}
