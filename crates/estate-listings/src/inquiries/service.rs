use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{Inquiry, InquiryId, InquiryStatus, InquiryView, NewInquiry};
use super::repository::InquiryRepository;
use crate::accounts::{AccountId, ResponsiblePartyResolver};
use crate::error::DomainError;
use crate::listings::{ListingId, ListingRepository};
use crate::principal::Caller;
use crate::repository::RepositoryError;

static INQUIRY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_inquiry_id() -> InquiryId {
    let id = INQUIRY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InquiryId(format!("inq-{id:06}"))
}

/// Inquiry workflow. Inquiries go to an admin picked by the resolver, never to the
/// listing's owner.
pub struct InquiryService {
    inquiries: Arc<dyn InquiryRepository>,
    listings: Arc<dyn ListingRepository>,
    resolver: Arc<dyn ResponsiblePartyResolver>,
}

impl InquiryService {
    pub fn new(
        inquiries: Arc<dyn InquiryRepository>,
        listings: Arc<dyn ListingRepository>,
        resolver: Arc<dyn ResponsiblePartyResolver>,
    ) -> Self {
        Self {
            inquiries,
            listings,
            resolver,
        }
    }

    pub fn create(&self, caller: &Caller, request: NewInquiry) -> Result<InquiryView, DomainError> {
        let principal = caller.require()?;
        let message = request.message.trim();
        if message.is_empty() {
            return Err(DomainError::validation("inquiry message must not be empty"));
        }

        let listing = self
            .listings
            .fetch(&request.listing_id)?
            .ok_or_else(|| DomainError::not_found("listing", &request.listing_id))?;
        let handler = self.resolver.resolve()?;

        let inquiry = Inquiry {
            id: next_inquiry_id(),
            listing: listing.id,
            requester: principal.id.clone(),
            original_owner: listing.owner,
            status: InquiryStatus::Pending,
            message: message.to_string(),
            response: None,
            responded_at: None,
            created_at: Utc::now(),
        };
        let stored = self.inquiries.insert(inquiry)?;
        info!(
            inquiry_id = %stored.id,
            listing_id = %stored.listing,
            requester = %stored.requester,
            handler = %handler,
            "inquiry created"
        );

        Ok(InquiryView {
            inquiry: stored,
            handler: Some(handler),
        })
    }

    pub fn respond(
        &self,
        caller: &Caller,
        id: &InquiryId,
        message: &str,
    ) -> Result<InquiryView, DomainError> {
        let principal = caller.require()?;
        principal.require_admin("respond to inquiries")?;

        let mut inquiry = self.load(id)?;
        inquiry.respond(message, Utc::now())?;
        self.save(&inquiry)?;
        info!(inquiry_id = %id, actor = %principal.id, "inquiry responded");
        self.view(inquiry)
    }

    pub fn set_status(
        &self,
        caller: &Caller,
        id: &InquiryId,
        raw_status: &str,
    ) -> Result<InquiryView, DomainError> {
        let principal = caller.require()?;
        principal.require_admin("change inquiry status")?;
        let status = InquiryStatus::parse(raw_status)?;

        let mut inquiry = self.load(id)?;
        inquiry.set_status(status)?;
        self.save(&inquiry)?;
        info!(inquiry_id = %id, actor = %principal.id, status = status.label(), "inquiry status set");
        self.view(inquiry)
    }

    pub fn list_for_listing(
        &self,
        caller: &Caller,
        listing: &ListingId,
    ) -> Result<Vec<InquiryView>, DomainError> {
        let principal = caller.require()?;
        principal.require_admin("list inquiries for a listing")?;

        let inquiries = self.inquiries.for_listing(listing)?;
        debug!(listing_id = %listing, count = inquiries.len(), "inquiries for listing");
        self.views(inquiries)
    }

    pub fn list_own(&self, caller: &Caller) -> Result<Vec<InquiryView>, DomainError> {
        let principal = caller.require()?;
        let inquiries = self.inquiries.for_requester(&principal.id)?;
        self.views(inquiries)
    }

    /// Readable by the requester and by admins.
    pub fn get(&self, caller: &Caller, id: &InquiryId) -> Result<InquiryView, DomainError> {
        let principal = caller.require()?;
        let inquiry = self.load(id)?;
        if !principal.is_admin() && inquiry.requester != principal.id {
            return Err(DomainError::authorization(format!(
                "inquiry '{id}' belongs to another account"
            )));
        }
        self.view(inquiry)
    }

    pub fn delete(&self, caller: &Caller, id: &InquiryId) -> Result<(), DomainError> {
        let principal = caller.require()?;
        principal.require_admin("delete inquiries")?;

        self.inquiries.delete(id).map_err(|err| missing(err, id))?;
        info!(inquiry_id = %id, actor = %principal.id, "inquiry deleted");
        Ok(())
    }

    fn load(&self, id: &InquiryId) -> Result<Inquiry, DomainError> {
        self.inquiries
            .fetch(id)?
            .ok_or_else(|| DomainError::not_found("inquiry", id))
    }

    fn save(&self, inquiry: &Inquiry) -> Result<(), DomainError> {
        self.inquiries
            .update(inquiry.clone())
            .map_err(|err| missing(err, &inquiry.id))
    }

    /// Handler as of now. No admin yields `None`; a store failure is an error.
    fn current_handler(&self) -> Result<Option<AccountId>, DomainError> {
        match self.resolver.resolve() {
            Ok(handler) => Ok(Some(handler)),
            Err(DomainError::DependencyUnavailable(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn view(&self, inquiry: Inquiry) -> Result<InquiryView, DomainError> {
        Ok(InquiryView {
            inquiry,
            handler: self.current_handler()?,
        })
    }

    fn views(&self, inquiries: Vec<Inquiry>) -> Result<Vec<InquiryView>, DomainError> {
        let handler = self.current_handler()?;
        Ok(inquiries
            .into_iter()
            .map(|inquiry| InquiryView {
                inquiry,
                handler: handler.clone(),
            })
            .collect())
    }
}

fn missing(err: RepositoryError, id: &InquiryId) -> DomainError {
    match err {
        RepositoryError::NotFound => DomainError::not_found("inquiry", id),
        other => other.into(),
    }
}
