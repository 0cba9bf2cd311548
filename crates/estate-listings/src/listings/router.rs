use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use super::domain::{Listing, ListingDraft, ListingId, ListingUpdate, RejectRequest, ReviewRequest};
use super::service::ListingSearch;
use super::visibility::Page;
use crate::error::DomainError;
use crate::http::ApiState;

pub fn listing_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/v1/listings",
            get(list_handler).post(create_handler),
        )
        .route(
            "/api/v1/listings/:listing_id",
            get(detail_handler)
                .patch(update_handler)
                .delete(delete_handler),
        )
        .route("/api/v1/listings/:listing_id/approve", post(approve_handler))
        .route("/api/v1/listings/:listing_id/reject", post(reject_handler))
        .route("/api/v1/listings/:listing_id/review", patch(review_handler))
        .with_state(state)
}

pub(crate) async fn list_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(search): Query<ListingSearch>,
) -> Result<Json<Page<Listing>>, DomainError> {
    let caller = state.caller(&headers)?;
    let page = state.listings.list(&caller, search)?;
    Ok(Json(page.map(|listing| state.assets.listing(listing))))
}

pub(crate) async fn detail_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Json<Listing>, DomainError> {
    let caller = state.caller(&headers)?;
    let listing = state.listings.get(&caller, &ListingId(listing_id))?;
    Ok(Json(state.assets.listing(listing)))
}

pub(crate) async fn create_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(draft): Json<ListingDraft>,
) -> Result<impl IntoResponse, DomainError> {
    let caller = state.caller(&headers)?;
    let listing = state.listings.create(&caller, draft)?;
    Ok((StatusCode::CREATED, Json(state.assets.listing(listing))))
}

pub(crate) async fn update_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
    Json(update): Json<ListingUpdate>,
) -> Result<Json<Listing>, DomainError> {
    let caller = state.caller(&headers)?;
    let listing = state
        .listings
        .update(&caller, &ListingId(listing_id), update)?;
    Ok(Json(state.assets.listing(listing)))
}

pub(crate) async fn delete_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<StatusCode, DomainError> {
    let caller = state.caller(&headers)?;
    state.listings.delete(&caller, &ListingId(listing_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn approve_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Json<Listing>, DomainError> {
    let caller = state.caller(&headers)?;
    let listing = state.listings.approve(&caller, &ListingId(listing_id))?;
    Ok(Json(state.assets.listing(listing)))
}

pub(crate) async fn reject_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
    body: Bytes,
) -> Result<Json<Listing>, DomainError> {
    let caller = state.caller(&headers)?;
    let reason = parse_reject_body(&body)?.reason;
    let listing = state
        .listings
        .reject(&caller, &ListingId(listing_id), reason)?;
    Ok(Json(state.assets.listing(listing)))
}

pub(crate) async fn review_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<Listing>, DomainError> {
    let caller = state.caller(&headers)?;
    let listing = state
        .listings
        .review(&caller, &ListingId(listing_id), request)?;
    Ok(Json(state.assets.listing(listing)))
}

/// An empty body rejects without a reason; anything else must be a valid payload.
fn parse_reject_body(body: &[u8]) -> Result<RejectRequest, DomainError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RejectRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| DomainError::validation(format!("invalid reject payload: {err}")))
}
