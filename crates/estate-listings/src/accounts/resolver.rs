use std::sync::Arc;

use super::domain::AccountId;
use super::repository::AccountRepository;
use crate::error::DomainError;
use crate::principal::Role;

/// Picks the account responsible for handling inquiries.
pub trait ResponsiblePartyResolver: Send + Sync {
    fn resolve(&self) -> Result<AccountId, DomainError>;
}

/// Routes to the active admin with the lowest id. Several admins are legal; the
/// ordering makes the choice stable across calls. Ids compare as plain strings, so
/// `acc-10` sorts before `acc-9`.
pub struct LowestIdAdminResolver {
    accounts: Arc<dyn AccountRepository>,
}

impl LowestIdAdminResolver {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }
}

impl ResponsiblePartyResolver for LowestIdAdminResolver {
    fn resolve(&self) -> Result<AccountId, DomainError> {
        self.accounts
            .with_role(Role::Admin)?
            .into_iter()
            .filter(|account| account.active)
            .map(|account| account.id)
            .min()
            .ok_or_else(|| {
                DomainError::DependencyUnavailable(
                    "no admin account is available to handle inquiries".to_string(),
                )
            })
    }
}
