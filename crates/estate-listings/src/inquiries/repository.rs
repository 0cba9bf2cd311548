use super::domain::{Inquiry, InquiryId};
use crate::accounts::AccountId;
use crate::listings::ListingId;
use crate::repository::RepositoryError;

pub trait InquiryRepository: Send + Sync {
    fn insert(&self, inquiry: Inquiry) -> Result<Inquiry, RepositoryError>;
    fn update(&self, inquiry: Inquiry) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &InquiryId) -> Result<Option<Inquiry>, RepositoryError>;
    fn delete(&self, id: &InquiryId) -> Result<(), RepositoryError>;
    /// Newest first.
    fn for_listing(&self, listing: &ListingId) -> Result<Vec<Inquiry>, RepositoryError>;
    /// Newest first.
    fn for_requester(&self, requester: &AccountId) -> Result<Vec<Inquiry>, RepositoryError>;
}
