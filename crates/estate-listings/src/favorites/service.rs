use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::accounts::{Account, AccountRepository};
use crate::error::DomainError;
use crate::listings::lifecycle::ensure_can_view;
use crate::listings::{Listing, ListingId, ListingRepository};
use crate::principal::{Caller, Principal};
use crate::repository::RepositoryError;

/// Outcome of a toggle: which way membership went, plus the resulting set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub listing_id: ListingId,
    pub is_favorite: bool,
    pub favorites: BTreeSet<ListingId>,
}

/// Membership changes read the favorites set and write back only that set;
/// concurrent toggles on the same account may overwrite one another.
pub struct FavoritesService {
    accounts: Arc<dyn AccountRepository>,
    listings: Arc<dyn ListingRepository>,
}

impl FavoritesService {
    pub fn new(accounts: Arc<dyn AccountRepository>, listings: Arc<dyn ListingRepository>) -> Self {
        Self { accounts, listings }
    }

    pub fn add(
        &self,
        caller: &Caller,
        listing_id: &ListingId,
    ) -> Result<BTreeSet<ListingId>, DomainError> {
        let principal = caller.require()?;
        if self.listings.fetch(listing_id)?.is_none() {
            return Err(DomainError::not_found("listing", listing_id));
        }

        let mut account = self.account(principal)?;
        if !account.favorites.insert(listing_id.clone()) {
            return Err(DomainError::Conflict(format!(
                "listing '{listing_id}' is already a favorite"
            )));
        }
        self.save(&account)?;
        info!(account = %account.id, listing_id = %listing_id, "favorite added");
        Ok(account.favorites)
    }

    pub fn remove(
        &self,
        caller: &Caller,
        listing_id: &ListingId,
    ) -> Result<BTreeSet<ListingId>, DomainError> {
        let principal = caller.require()?;
        let mut account = self.account(principal)?;
        if !account.favorites.remove(listing_id) {
            return Err(DomainError::Conflict(format!(
                "listing '{listing_id}' is not a favorite"
            )));
        }
        self.save(&account)?;
        info!(account = %account.id, listing_id = %listing_id, "favorite removed");
        Ok(account.favorites)
    }

    /// Flip membership. Only a missing account can make this fail.
    pub fn toggle(
        &self,
        caller: &Caller,
        listing_id: &ListingId,
    ) -> Result<FavoriteToggle, DomainError> {
        let principal = caller.require()?;
        let mut account = self.account(principal)?;

        let is_favorite = if account.favorites.remove(listing_id) {
            false
        } else {
            account.favorites.insert(listing_id.clone());
            true
        };
        self.save(&account)?;
        info!(account = %account.id, listing_id = %listing_id, is_favorite, "favorite toggled");

        Ok(FavoriteToggle {
            listing_id: listing_id.clone(),
            is_favorite,
            favorites: account.favorites,
        })
    }

    /// Resolve saved ids to listings. Deleted listings, and listings the caller may no
    /// longer see, are left out; the stored set is not pruned.
    pub fn list(&self, caller: &Caller) -> Result<Vec<Listing>, DomainError> {
        let principal = caller.require()?;
        let account = self.account(principal)?;

        let mut resolved = Vec::with_capacity(account.favorites.len());
        for listing_id in &account.favorites {
            match self.listings.fetch(listing_id)? {
                Some(listing) if ensure_can_view(&listing, caller).is_ok() => {
                    resolved.push(listing)
                }
                Some(_) => debug!(listing_id = %listing_id, "favorite hidden from caller"),
                None => debug!(listing_id = %listing_id, "favorite points at a deleted listing"),
            }
        }
        Ok(resolved)
    }

    fn account(&self, principal: &Principal) -> Result<Account, DomainError> {
        self.accounts
            .fetch(&principal.id)?
            .ok_or_else(|| DomainError::not_found("account", &principal.id))
    }

    fn save(&self, account: &Account) -> Result<(), DomainError> {
        self.accounts
            .set_favorites(&account.id, account.favorites.clone())
            .map_err(|err| match err {
                RepositoryError::NotFound => DomainError::not_found("account", &account.id),
                other => other.into(),
            })
    }
}
