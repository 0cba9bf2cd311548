use super::domain::{Listing, ListingId};
use super::visibility::ListingQuery;
use crate::repository::RepositoryError;

/// Document store for listings. Each call is the store's unit of atomicity; there is
/// no multi-call transaction.
pub trait ListingRepository: Send + Sync {
    fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError>;
    /// Replace the stored document; fails with `NotFound` when absent.
    fn update(&self, listing: Listing) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError>;
    /// Bump the view counter in place and return the stored document. Touches no
    /// other field.
    fn increment_views(&self, id: &ListingId) -> Result<Listing, RepositoryError>;
    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError>;
    /// Matching documents inside the window plus the count of all matches.
    fn find(&self, query: &ListingQuery) -> Result<(Vec<Listing>, u64), RepositoryError>;
}
