//! Authenticated caller model and the bearer-token boundary that produces it.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::accounts::{AccountId, AccountRepository};
use crate::error::DomainError;

/// Role carried by an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
            Role::Admin => "admin",
        }
    }
}

/// Caller identity supplied per request by the credential collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: AccountId,
    pub role: Role,
    pub active: bool,
}

impl Principal {
    pub fn new(id: AccountId, role: Role) -> Self {
        Self {
            id,
            role,
            active: true,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self, action: &str) -> Result<(), DomainError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::authorization(format!(
                "only admins may {action}"
            )))
        }
    }
}

/// Who is making a request: nobody, or an authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    Principal(Principal),
}

impl Caller {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Caller::Anonymous => None,
            Caller::Principal(principal) => Some(principal),
        }
    }

    /// Principal for operations that need one; deactivated accounts are refused.
    pub fn require(&self) -> Result<&Principal, DomainError> {
        match self {
            Caller::Anonymous => Err(DomainError::Authentication(
                "a signed-in account is required".to_string(),
            )),
            Caller::Principal(principal) if !principal.active => Err(
                DomainError::Authentication("account is deactivated".to_string()),
            ),
            Caller::Principal(principal) => Ok(principal),
        }
    }
}

impl From<Principal> for Caller {
    fn from(value: Principal) -> Self {
        Caller::Principal(value)
    }
}

/// Credential verification seam; turns a bearer token into a principal.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<Principal, DomainError>;
}

/// Token table resolved against the account store on every call, so role and
/// activation changes apply immediately.
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, AccountId>,
    accounts: Arc<dyn AccountRepository>,
}

impl StaticTokenAuthenticator {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self {
            tokens: HashMap::new(),
            accounts,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>, account: AccountId) -> Self {
        self.tokens.insert(token.into(), account);
        self
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authenticate(&self, token: &str) -> Result<Principal, DomainError> {
        let invalid = || DomainError::Authentication("invalid or expired token".to_string());
        let account_id = self.tokens.get(token).ok_or_else(invalid)?;
        let account = self
            .accounts
            .fetch(account_id)
            .map_err(DomainError::from)?
            .ok_or_else(invalid)?;
        Ok(account.principal())
    }
}
