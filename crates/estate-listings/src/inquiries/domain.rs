use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounts::AccountId;
use crate::error::DomainError;
use crate::listings::ListingId;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InquiryId(pub String);

impl From<&str> for InquiryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for InquiryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `pending → responded → closed`, or `pending → closed` directly. Closed is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Pending,
    Responded,
    Closed,
}

impl InquiryStatus {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "pending" => Ok(Self::Pending),
            "responded" => Ok(Self::Responded),
            "closed" => Ok(Self::Closed),
            other => Err(DomainError::validation(format!(
                "status must be one of pending, responded, closed; got '{other}'"
            ))),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            InquiryStatus::Pending => "pending",
            InquiryStatus::Responded => "responded",
            InquiryStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: InquiryId,
    pub listing: ListingId,
    pub requester: AccountId,
    /// Owner of the listing when the inquiry was opened; never resynchronized.
    pub original_owner: AccountId,
    pub status: InquiryStatus,
    pub message: String,
    pub response: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Inquiry {
    pub fn respond(&mut self, message: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(DomainError::validation("response message must not be empty"));
        }
        self.ensure_open()?;

        self.status = InquiryStatus::Responded;
        self.response = Some(message.to_string());
        self.responded_at = Some(at);
        Ok(())
    }

    /// Explicit status set. Re-closing a closed inquiry is a no-op; anything else
    /// out of `closed` is refused.
    pub fn set_status(&mut self, status: InquiryStatus) -> Result<(), DomainError> {
        if self.status == InquiryStatus::Closed && status == InquiryStatus::Closed {
            return Ok(());
        }
        self.ensure_open()?;
        self.status = status;
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.status == InquiryStatus::Closed {
            Err(DomainError::validation(format!(
                "inquiry '{}' is closed",
                self.id
            )))
        } else {
            Ok(())
        }
    }
}

/// Inquiry as returned to callers, with the handling admin resolved at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryView {
    #[serde(flatten)]
    pub inquiry: Inquiry,
    pub handler: Option<AccountId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewInquiry {
    pub listing_id: ListingId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InquiryReply {
    pub message: String,
}

/// Raw status so unknown values surface as validation failures, not parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusChange {
    pub status: String,
}
