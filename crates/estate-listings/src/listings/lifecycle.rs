//! Publication state machine for a single listing.
//!
//! Every transition here is a pure function over an in-memory document; the service
//! persists the result with one store update so a transition lands completely or not
//! at all.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{require_price, require_text, Listing, ListingUpdate};
use super::images::{dropped_public_ids, resolve_images};
use crate::error::DomainError;
use crate::principal::{Caller, Principal, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationState {
    Pending,
    Published,
    Rejected,
}

impl PublicationState {
    pub fn of(listing: &Listing) -> Self {
        if listing.published && listing.approved {
            Self::Published
        } else if !listing.approved && listing.rejection_reason.is_some() {
            Self::Rejected
        } else {
            Self::Pending
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PublicationState::Pending => "pending",
            PublicationState::Published => "published",
            PublicationState::Rejected => "rejected",
        }
    }
}

/// Initial `(published, approved)` flags, decided from the creator's role at
/// construction time. Admins self-certify; agents wait for review.
pub fn initial_flags(creator: Role) -> Result<(bool, bool), DomainError> {
    match creator {
        Role::Admin => Ok((true, true)),
        Role::Agent => Ok((false, false)),
        Role::User => Err(DomainError::authorization(
            "only agents and admins may create listings",
        )),
    }
}

/// Update and delete require ownership or the admin role.
pub fn ensure_can_manage(listing: &Listing, actor: &Principal) -> Result<(), DomainError> {
    if actor.is_admin() || listing.is_owned_by(&actor.id) {
        Ok(())
    } else {
        Err(DomainError::authorization(format!(
            "listing '{}' belongs to another account",
            listing.id
        )))
    }
}

/// Detail reads of a non-public listing are limited to its owner and admins. The
/// listing's existence is not hidden, only its content.
pub fn ensure_can_view(listing: &Listing, caller: &Caller) -> Result<(), DomainError> {
    if listing.is_public() {
        return Ok(());
    }

    match caller.principal() {
        Some(principal)
            if principal.active && (principal.is_admin() || listing.is_owned_by(&principal.id)) =>
        {
            Ok(())
        }
        _ => Err(DomainError::authorization(format!(
            "listing '{}' is not published",
            listing.id
        ))),
    }
}

/// Result of applying an update: the images that are no longer referenced.
#[derive(Debug, Default)]
pub struct UpdateEffects {
    pub dropped_public_ids: Vec<String>,
}

/// Apply an allow-listed patch. Non-admin edits always return the listing to
/// unpublished; the approval flag is left as it was.
pub fn apply_update(
    listing: &mut Listing,
    update: ListingUpdate,
    actor: &Principal,
    now: DateTime<Utc>,
) -> Result<UpdateEffects, DomainError> {
    ensure_can_manage(listing, actor)?;

    if update.owner.is_some() && !actor.is_admin() {
        return Err(DomainError::authorization(
            "only admins may reassign listing ownership",
        ));
    }

    let ListingUpdate {
        title,
        description,
        address,
        city,
        price,
        property_type,
        transaction_status,
        bedrooms,
        bathrooms,
        area_sq_ft,
        images,
        published,
        owner,
    } = update;

    if let Some(title) = &title {
        require_text("title", title)?;
    }
    if let Some(address) = &address {
        require_text("address", address)?;
    }
    if let Some(city) = &city {
        require_text("city", city)?;
    }
    if let Some(price) = price {
        require_price(price)?;
    }
    let images = images
        .map(|inputs| resolve_images(&listing.id, inputs))
        .transpose()?;

    if let Some(title) = title {
        listing.title = title.trim().to_string();
    }
    if let Some(description) = description {
        listing.description = description;
    }
    if let Some(address) = address {
        listing.address = address.trim().to_string();
    }
    if let Some(city) = city {
        listing.city = city.trim().to_string();
    }
    if let Some(price) = price {
        listing.price = price;
    }
    if let Some(property_type) = property_type {
        listing.property_type = property_type;
    }
    if let Some(transaction_status) = transaction_status {
        listing.transaction_status = transaction_status;
    }
    if let Some(bedrooms) = bedrooms {
        listing.bedrooms = bedrooms;
    }
    if let Some(bathrooms) = bathrooms {
        listing.bathrooms = bathrooms;
    }
    if let Some(area) = area_sq_ft {
        listing.area_sq_ft = Some(area);
    }
    if let Some(owner) = owner {
        listing.owner = owner;
    }

    let mut effects = UpdateEffects::default();
    if let Some(images) = images {
        effects.dropped_public_ids = dropped_public_ids(&listing.images, &images);
        listing.images = images;
    }

    if actor.is_admin() {
        if let Some(published) = published {
            listing.published = published;
        }
    } else {
        listing.published = false;
    }

    listing.updated_at = now;
    Ok(effects)
}

/// Admin sanction: live and approved, any earlier rejection cleared.
pub fn approve(
    listing: &mut Listing,
    actor: &Principal,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    actor.require_admin("approve listings")?;
    listing.approved = true;
    listing.published = true;
    listing.rejection_reason = None;
    listing.updated_at = now;
    Ok(())
}

/// Admin rejection: withdrawn from publication, reason stored or cleared.
pub fn reject(
    listing: &mut Listing,
    actor: &Principal,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    actor.require_admin("reject listings")?;
    listing.approved = false;
    listing.published = false;
    listing.rejection_reason = reason
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty());
    listing.updated_at = now;
    Ok(())
}
