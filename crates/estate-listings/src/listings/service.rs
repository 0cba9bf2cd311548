use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{
    require_price, require_text, Listing, ListingDraft, ListingId, ListingUpdate, PropertyType,
    ReviewRequest, TransactionStatus,
};
use super::images::{resolve_images, ImageStore};
use super::lifecycle::{self, PublicationState};
use super::repository::ListingRepository;
use super::visibility::{
    compute_visibility, parse_sort, ListingFilters, ListingQuery, Page, PageRequest,
};
use crate::accounts::AccountId;
use crate::config::ListingConfig;
use crate::error::DomainError;
use crate::principal::Caller;
use crate::repository::RepositoryError;

static LISTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_listing_id() -> ListingId {
    let id = LISTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ListingId(format!("lst-{id:06}"))
}

/// Flat query-string shape of a listing search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSearch {
    pub transaction_status: Option<TransactionStatus>,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub bedrooms: Option<u8>,
    pub city: Option<String>,
    pub owner: Option<AccountId>,
    pub search: Option<String>,
    #[serde(default)]
    pub show_mine: bool,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListingSearch {
    fn filters(&self) -> ListingFilters {
        ListingFilters {
            transaction_status: self.transaction_status,
            property_type: self.property_type,
            min_price: self.min_price,
            max_price: self.max_price,
            bedrooms: self.bedrooms,
            city: self.city.clone(),
            owner: self.owner.clone(),
            search: self.search.clone(),
            show_mine: self.show_mine,
        }
    }
}

/// Entry point for every listing operation: authorizes, applies the lifecycle rules,
/// then persists with a single document write.
pub struct ListingService {
    repository: Arc<dyn ListingRepository>,
    images: Arc<dyn ImageStore>,
    config: ListingConfig,
}

impl ListingService {
    pub fn new(
        repository: Arc<dyn ListingRepository>,
        images: Arc<dyn ImageStore>,
        config: ListingConfig,
    ) -> Self {
        Self {
            repository,
            images,
            config,
        }
    }

    pub fn list(
        &self,
        caller: &Caller,
        search: ListingSearch,
    ) -> Result<Page<Listing>, DomainError> {
        let predicate = compute_visibility(caller, search.filters())?;
        let sort = parse_sort(search.sort.as_deref())?;
        let window = PageRequest::new(search.page, search.limit, &self.config)?;

        let query = ListingQuery {
            predicate,
            sort,
            skip: window.skip(),
            limit: window.limit as usize,
        };
        let (items, total) = self.repository.find(&query)?;
        debug!(total, page = window.page, "listing search");
        Ok(Page::new(items, total, window))
    }

    /// Detail read. Each successful call counts one view. The counter is bumped in
    /// the store, so an edit landing between the check and the bump is kept.
    pub fn get(&self, caller: &Caller, id: &ListingId) -> Result<Listing, DomainError> {
        let listing = self.load(id)?;
        lifecycle::ensure_can_view(&listing, caller)?;

        let listing = self
            .repository
            .increment_views(id)
            .map_err(|err| missing(err, id))?;
        lifecycle::ensure_can_view(&listing, caller)?;
        debug!(listing_id = %id, views = listing.views, "listing viewed");
        Ok(listing)
    }

    pub fn create(&self, caller: &Caller, draft: ListingDraft) -> Result<Listing, DomainError> {
        let principal = caller.require()?;
        let (published, approved) = lifecycle::initial_flags(principal.role)?;

        require_text("title", &draft.title)?;
        require_text("address", &draft.address)?;
        require_text("city", &draft.city)?;
        require_price(draft.price)?;

        let id = next_listing_id();
        let images = resolve_images(&id, draft.images)?;
        let now = Utc::now();
        let listing = Listing {
            id,
            owner: principal.id.clone(),
            title: draft.title.trim().to_string(),
            description: draft.description,
            address: draft.address.trim().to_string(),
            city: draft.city.trim().to_string(),
            price: draft.price,
            property_type: draft.property_type,
            transaction_status: draft.transaction_status,
            bedrooms: draft.bedrooms,
            bathrooms: draft.bathrooms,
            area_sq_ft: draft.area_sq_ft,
            images,
            published,
            approved,
            rejection_reason: None,
            views: 0,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(listing)?;
        info!(
            listing_id = %stored.id,
            actor = %principal.id,
            state = PublicationState::of(&stored).label(),
            "listing created"
        );
        Ok(stored)
    }

    pub fn update(
        &self,
        caller: &Caller,
        id: &ListingId,
        update: ListingUpdate,
    ) -> Result<Listing, DomainError> {
        let principal = caller.require()?;
        let mut listing = self.load(id)?;

        let effects = lifecycle::apply_update(&mut listing, update, principal, Utc::now())?;
        self.repository
            .update(listing.clone())
            .map_err(|err| missing(err, id))?;
        info!(
            listing_id = %id,
            actor = %principal.id,
            published = listing.published,
            approved = listing.approved,
            "listing updated"
        );

        self.discard_images(id, effects.dropped_public_ids);
        Ok(listing)
    }

    pub fn delete(&self, caller: &Caller, id: &ListingId) -> Result<(), DomainError> {
        let principal = caller.require()?;
        let listing = self.load(id)?;
        lifecycle::ensure_can_manage(&listing, principal)?;

        self.repository.delete(id).map_err(|err| missing(err, id))?;
        info!(listing_id = %id, actor = %principal.id, "listing deleted");

        let public_ids = listing
            .images
            .into_iter()
            .map(|image| image.public_id)
            .collect();
        self.discard_images(id, public_ids);
        Ok(())
    }

    pub fn approve(&self, caller: &Caller, id: &ListingId) -> Result<Listing, DomainError> {
        let principal = caller.require()?;
        principal.require_admin("approve listings")?;

        let mut listing = self.load(id)?;
        lifecycle::approve(&mut listing, principal, Utc::now())?;
        self.repository
            .update(listing.clone())
            .map_err(|err| missing(err, id))?;
        info!(listing_id = %id, actor = %principal.id, "listing approved");
        Ok(listing)
    }

    pub fn reject(
        &self,
        caller: &Caller,
        id: &ListingId,
        reason: Option<String>,
    ) -> Result<Listing, DomainError> {
        let principal = caller.require()?;
        principal.require_admin("reject listings")?;

        let mut listing = self.load(id)?;
        lifecycle::reject(&mut listing, principal, reason, Utc::now())?;
        self.repository
            .update(listing.clone())
            .map_err(|err| missing(err, id))?;
        info!(
            listing_id = %id,
            actor = %principal.id,
            reason = listing.rejection_reason.as_deref().unwrap_or(""),
            "listing rejected"
        );
        Ok(listing)
    }

    /// Single review entry point: `approved` decides between approve and reject.
    pub fn review(
        &self,
        caller: &Caller,
        id: &ListingId,
        request: ReviewRequest,
    ) -> Result<Listing, DomainError> {
        let principal = caller.require()?;
        principal.require_admin("review listings")?;

        match request.approved {
            Some(true) => self.approve(caller, id),
            Some(false) => self.reject(caller, id, request.rejection_reason),
            None => Err(DomainError::validation(
                "review requires the approved flag",
            )),
        }
    }

    pub(crate) fn load(&self, id: &ListingId) -> Result<Listing, DomainError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| DomainError::not_found("listing", id))
    }

    fn discard_images(&self, id: &ListingId, public_ids: Vec<String>) {
        if public_ids.is_empty() {
            return;
        }
        if let Err(err) = self.images.discard(&public_ids) {
            warn!(listing_id = %id, count = public_ids.len(), error = %err, "image cleanup failed");
        }
    }
}

fn missing(err: RepositoryError, id: &ListingId) -> DomainError {
    match err {
        RepositoryError::NotFound => DomainError::not_found("listing", id),
        other => other.into(),
    }
}
