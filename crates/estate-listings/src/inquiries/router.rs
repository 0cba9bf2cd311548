use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use super::domain::{InquiryId, InquiryReply, InquiryView, NewInquiry, StatusChange};
use crate::error::DomainError;
use crate::http::ApiState;
use crate::listings::ListingId;

pub fn inquiry_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/inquiries", post(create_handler))
        .route("/api/v1/inquiries/mine", get(own_handler))
        .route(
            "/api/v1/inquiries/:inquiry_id",
            get(detail_handler).delete(delete_handler),
        )
        .route("/api/v1/inquiries/:inquiry_id/respond", post(respond_handler))
        .route("/api/v1/inquiries/:inquiry_id/status", patch(status_handler))
        .route(
            "/api/v1/listings/:listing_id/inquiries",
            get(listing_inquiries_handler),
        )
        .with_state(state)
}

pub(crate) async fn create_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(request): Json<NewInquiry>,
) -> Result<impl IntoResponse, DomainError> {
    let caller = state.caller(&headers)?;
    let view = state.inquiries.create(&caller, request)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub(crate) async fn own_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Vec<InquiryView>>, DomainError> {
    let caller = state.caller(&headers)?;
    Ok(Json(state.inquiries.list_own(&caller)?))
}

pub(crate) async fn detail_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(inquiry_id): Path<String>,
) -> Result<Json<InquiryView>, DomainError> {
    let caller = state.caller(&headers)?;
    Ok(Json(state.inquiries.get(&caller, &InquiryId(inquiry_id))?))
}

pub(crate) async fn delete_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(inquiry_id): Path<String>,
) -> Result<StatusCode, DomainError> {
    let caller = state.caller(&headers)?;
    state.inquiries.delete(&caller, &InquiryId(inquiry_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn respond_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(inquiry_id): Path<String>,
    Json(reply): Json<InquiryReply>,
) -> Result<Json<InquiryView>, DomainError> {
    let caller = state.caller(&headers)?;
    let view = state
        .inquiries
        .respond(&caller, &InquiryId(inquiry_id), &reply.message)?;
    Ok(Json(view))
}

pub(crate) async fn status_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(inquiry_id): Path<String>,
    Json(change): Json<StatusChange>,
) -> Result<Json<InquiryView>, DomainError> {
    let caller = state.caller(&headers)?;
    let view = state
        .inquiries
        .set_status(&caller, &InquiryId(inquiry_id), &change.status)?;
    Ok(Json(view))
}

pub(crate) async fn listing_inquiries_handler(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(listing_id): Path<String>,
) -> Result<Json<Vec<InquiryView>>, DomainError> {
    let caller = state.caller(&headers)?;
    let views = state
        .inquiries
        .list_for_listing(&caller, &ListingId(listing_id))?;
    Ok(Json(views))
}
