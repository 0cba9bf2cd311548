use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::listings::ListingId;
use crate::principal::{Principal, Role};

/// Identifier wrapper for accounts. Ordering is lexical and drives admin tie-breaks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    /// Saved listings; ids may dangle after a listing is deleted.
    pub favorites: BTreeSet<ListingId>,
}

impl Account {
    pub fn new(
        id: AccountId,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
            active: true,
            favorites: BTreeSet::new(),
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id.clone(),
            role: self.role,
            active: self.active,
        }
    }
}
