//! In-memory document stores. Each method takes the lock once, so a single call is
//! atomic and nothing spans calls.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::accounts::{Account, AccountId, AccountRepository};
use crate::inquiries::{Inquiry, InquiryId, InquiryRepository};
use crate::listings::visibility::compare_listings;
use crate::listings::{ImageStore, ImageStoreError, Listing, ListingId, ListingQuery, ListingRepository};
use crate::principal::Role;
use crate::repository::RepositoryError;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
}

#[derive(Default, Clone)]
pub struct InMemoryListingRepository {
    records: Arc<Mutex<HashMap<ListingId, Listing>>>,
}

impl ListingRepository for InMemoryListingRepository {
    fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&listing.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(listing.id.clone(), listing.clone());
        Ok(listing)
    }

    fn update(&self, listing: Listing) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&listing.id) {
            Some(slot) => {
                *slot = listing;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn increment_views(&self, id: &ListingId) -> Result<Listing, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let listing = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        listing.views += 1;
        Ok(listing.clone())
    }

    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError> {
        lock(&self.records)?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn find(&self, query: &ListingQuery) -> Result<(Vec<Listing>, u64), RepositoryError> {
        let guard = lock(&self.records)?;
        let mut matches: Vec<&Listing> = guard
            .values()
            .filter(|listing| query.predicate.matches(listing))
            .collect();
        matches.sort_by(|a, b| compare_listings(&query.sort, a, b));

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .cloned()
            .collect();
        Ok((items, total))
    }
}

#[derive(Default, Clone)]
pub struct InMemoryAccountRepository {
    records: Arc<Mutex<HashMap<AccountId, Account>>>,
}

impl AccountRepository for InMemoryAccountRepository {
    fn insert(&self, account: Account) -> Result<Account, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&account.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    fn update(&self, account: Account) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&account.id) {
            Some(slot) => {
                *slot = account;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn set_favorites(
        &self,
        id: &AccountId,
        favorites: BTreeSet<ListingId>,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        let account = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        account.favorites = favorites;
        Ok(())
    }

    fn with_role(&self, role: Role) -> Result<Vec<Account>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut accounts: Vec<Account> = guard
            .values()
            .filter(|account| account.role == role)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(accounts)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryInquiryRepository {
    records: Arc<Mutex<HashMap<InquiryId, Inquiry>>>,
}

impl InMemoryInquiryRepository {
    fn select(
        &self,
        keep: impl Fn(&Inquiry) -> bool,
    ) -> Result<Vec<Inquiry>, RepositoryError> {
        let guard = lock(&self.records)?;
        let mut selected: Vec<Inquiry> = guard.values().filter(|i| keep(i)).cloned().collect();
        selected.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(selected)
    }
}

impl InquiryRepository for InMemoryInquiryRepository {
    fn insert(&self, inquiry: Inquiry) -> Result<Inquiry, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&inquiry.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(inquiry.id.clone(), inquiry.clone());
        Ok(inquiry)
    }

    fn update(&self, inquiry: Inquiry) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        match guard.get_mut(&inquiry.id) {
            Some(slot) => {
                *slot = inquiry;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &InquiryId) -> Result<Option<Inquiry>, RepositoryError> {
        Ok(lock(&self.records)?.get(id).cloned())
    }

    fn delete(&self, id: &InquiryId) -> Result<(), RepositoryError> {
        lock(&self.records)?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn for_listing(&self, listing: &ListingId) -> Result<Vec<Inquiry>, RepositoryError> {
        self.select(|inquiry| &inquiry.listing == listing)
    }

    fn for_requester(&self, requester: &AccountId) -> Result<Vec<Inquiry>, RepositoryError> {
        self.select(|inquiry| &inquiry.requester == requester)
    }
}

/// Records discarded handles instead of talking to a storage backend.
#[derive(Default, Clone)]
pub struct InMemoryImageStore {
    discarded: Arc<Mutex<Vec<String>>>,
}

impl InMemoryImageStore {
    pub fn discarded(&self) -> Vec<String> {
        self.discarded
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ImageStore for InMemoryImageStore {
    fn discard(&self, public_ids: &[String]) -> Result<(), ImageStoreError> {
        self.discarded
            .lock()
            .map_err(|_| ImageStoreError::Unavailable("image store lock poisoned".to_string()))?
            .extend_from_slice(public_ids);
        Ok(())
    }
}
