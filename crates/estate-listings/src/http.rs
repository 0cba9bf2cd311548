//! Shared HTTP plumbing: request state, caller extraction and the combined router.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use axum::Router;

use crate::error::DomainError;
use crate::favorites::{favorites_router, FavoritesService};
use crate::inquiries::{inquiry_router, InquiryService};
use crate::listings::{listing_router, AssetUrls, ListingService};
use crate::principal::{Authenticator, Caller};

/// Services and boundary collaborators shared by every handler.
#[derive(Clone)]
pub struct ApiState {
    pub listings: Arc<ListingService>,
    pub favorites: Arc<FavoritesService>,
    pub inquiries: Arc<InquiryService>,
    pub auth: Arc<dyn Authenticator>,
    pub assets: AssetUrls,
}

impl ApiState {
    /// No `Authorization` header means an anonymous caller; a present but invalid
    /// one is an authentication failure.
    pub fn caller(&self, headers: &HeaderMap) -> Result<Caller, DomainError> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(Caller::Anonymous);
        };

        let token = value
            .to_str()
            .ok()
            .and_then(|raw| raw.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                DomainError::Authentication("expected a bearer token".to_string())
            })?;

        self.auth.authenticate(token).map(Caller::Principal)
    }
}

/// Every domain route, ready to be layered by the binary.
pub fn api_router(state: ApiState) -> Router {
    listing_router(state.clone())
        .merge(favorites_router(state.clone()))
        .merge(inquiry_router(state))
}
