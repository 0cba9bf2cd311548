use std::collections::BTreeSet;

use super::domain::{Account, AccountId};
use crate::listings::ListingId;
use crate::principal::Role;
use crate::repository::RepositoryError;

/// Storage abstraction for accounts and their favorites sets.
pub trait AccountRepository: Send + Sync {
    fn insert(&self, account: Account) -> Result<Account, RepositoryError>;
    /// Replace the stored document; fails with `NotFound` when absent.
    fn update(&self, account: Account) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AccountId) -> Result<Option<Account>, RepositoryError>;
    /// Overwrite only the favorites set; role and `active` are left as stored.
    fn set_favorites(
        &self,
        id: &AccountId,
        favorites: BTreeSet<ListingId>,
    ) -> Result<(), RepositoryError>;
    fn with_role(&self, role: Role) -> Result<Vec<Account>, RepositoryError>;
}
