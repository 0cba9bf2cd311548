//! Persisted accounts: the stored counterpart of a principal, owner of a favorites set.

pub mod domain;
pub mod repository;
pub mod resolver;

pub use domain::{Account, AccountId};
pub use repository::AccountRepository;
pub use resolver::{LowestIdAdminResolver, ResponsiblePartyResolver};
