use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounts::AccountId;
use crate::error::DomainError;

/// Identifier wrapper for listings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deal stage of a listing; independent of publication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionStatus {
    ForSale,
    ForRent,
    Sold,
    Rented,
}

impl TransactionStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "for-sale" => Some(Self::ForSale),
            "for-rent" => Some(Self::ForRent),
            "sold" => Some(Self::Sold),
            "rented" => Some(Self::Rented),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
    Condo,
    Townhouse,
    Land,
    Commercial,
}

impl PropertyType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "house" => Some(Self::House),
            "apartment" => Some(Self::Apartment),
            "condo" => Some(Self::Condo),
            "townhouse" => Some(Self::Townhouse),
            "land" => Some(Self::Land),
            "commercial" => Some(Self::Commercial),
            _ => None,
        }
    }
}

/// Stored image reference as handed back by the image storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingImage {
    pub url: String,
    pub public_id: String,
}

/// Image reference supplied by a caller; `public_id` is synthesized when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageInput {
    pub url: String,
    #[serde(default)]
    pub public_id: Option<String>,
}

impl ImageInput {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            public_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub owner: AccountId,
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub price: u64,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub transaction_status: TransactionStatus,
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub area_sq_ft: Option<u32>,
    pub images: Vec<ListingImage>,
    pub published: bool,
    pub approved: bool,
    pub rejection_reason: Option<String>,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Visible to everyone only when both the readiness and sanction flags hold.
    pub fn is_public(&self) -> bool {
        self.published && self.approved
    }

    pub fn is_owned_by(&self, account: &AccountId) -> bool {
        &self.owner == account
    }
}

/// Fields accepted when creating a listing. Publication flags are decided by the
/// creator's role, never by the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListingDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub address: String,
    pub city: String,
    pub price: u64,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default = "default_transaction_status")]
    pub transaction_status: TransactionStatus,
    #[serde(default)]
    pub bedrooms: u8,
    #[serde(default)]
    pub bathrooms: u8,
    #[serde(default)]
    pub area_sq_ft: Option<u32>,
    #[serde(default)]
    pub images: Vec<ImageInput>,
}

fn default_transaction_status() -> TransactionStatus {
    TransactionStatus::ForSale
}

/// Allow-listed patch for an existing listing. Approval state is not part of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub price: Option<u64>,
    #[serde(rename = "type")]
    pub property_type: Option<PropertyType>,
    pub transaction_status: Option<TransactionStatus>,
    pub bedrooms: Option<u8>,
    pub bathrooms: Option<u8>,
    pub area_sq_ft: Option<u32>,
    pub images: Option<Vec<ImageInput>>,
    pub published: Option<bool>,
    pub owner: Option<AccountId>,
}

/// Admin review payload; `approved` must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReviewRequest {
    pub approved: Option<bool>,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        Err(DomainError::validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

pub(crate) fn require_price(price: u64) -> Result<(), DomainError> {
    if price == 0 {
        Err(DomainError::validation("price must be greater than zero"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_schema_rejects_unknown_fields() {
        let err = serde_json::from_str::<ListingUpdate>(r#"{"price": 10, "approved": true}"#)
            .expect_err("approved is not patchable");
        assert!(err.to_string().contains("unknown field"));

        let patch: ListingUpdate =
            serde_json::from_str(r#"{"price": 10, "transactionStatus": "for-rent"}"#)
                .expect("allow-listed fields parse");
        assert_eq!(patch.price, Some(10));
        assert_eq!(patch.transaction_status, Some(TransactionStatus::ForRent));
    }

    #[test]
    fn transaction_status_parses_loose_spellings() {
        assert_eq!(
            TransactionStatus::parse("FOR_SALE"),
            Some(TransactionStatus::ForSale)
        );
        assert_eq!(TransactionStatus::parse("leased"), None);
    }
}
