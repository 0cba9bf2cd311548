//! Bulk seeding of listings from a CSV export. Every row goes through the regular
//! create path, so role-based publication flags and validation still apply.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{ImageInput, Listing, ListingDraft, PropertyType, TransactionStatus};
use super::service::ListingService;
use crate::error::DomainError;
use crate::principal::Caller;

#[derive(Debug)]
pub enum ListingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: usize, reason: String },
    Rejected { line: usize, source: DomainError },
}

impl std::fmt::Display for ListingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingImportError::Io(err) => write!(f, "failed to read listing export: {}", err),
            ListingImportError::Csv(err) => write!(f, "invalid listing CSV data: {}", err),
            ListingImportError::Row { line, reason } => {
                write!(f, "row {}: {}", line, reason)
            }
            ListingImportError::Rejected { line, source } => {
                write!(f, "row {} was rejected: {}", line, source)
            }
        }
    }
}

impl std::error::Error for ListingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingImportError::Io(err) => Some(err),
            ListingImportError::Csv(err) => Some(err),
            ListingImportError::Row { .. } => None,
            ListingImportError::Rejected { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ListingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ListingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct ListingCsvImporter;

impl ListingCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        service: &ListingService,
        caller: &Caller,
    ) -> Result<Vec<Listing>, ListingImportError> {
        let file = File::open(path)?;
        Self::from_reader(file, service, caller)
    }

    /// Stops at the first bad row; rows before it stay created.
    pub fn from_reader<R: Read>(
        reader: R,
        service: &ListingService,
        caller: &Caller,
    ) -> Result<Vec<Listing>, ListingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut created = Vec::new();

        for (index, record) in csv_reader.deserialize::<ListingRow>().enumerate() {
            let line = index + 2;
            let draft = record?.into_draft(line)?;
            let listing = service
                .create(caller, draft)
                .map_err(|source| ListingImportError::Rejected { line, source })?;
            created.push(listing);
        }

        Ok(created)
    }
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    title: String,
    #[serde(default)]
    description: String,
    address: String,
    city: String,
    price: u64,
    #[serde(rename = "type")]
    property_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    transaction_status: Option<String>,
    #[serde(default)]
    bedrooms: u8,
    #[serde(default)]
    bathrooms: u8,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    area: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    image_urls: Option<String>,
}

impl ListingRow {
    fn into_draft(self, line: usize) -> Result<ListingDraft, ListingImportError> {
        let row_error = |reason: String| ListingImportError::Row { line, reason };

        let property_type = PropertyType::parse(&self.property_type)
            .ok_or_else(|| row_error(format!("unknown property type '{}'", self.property_type)))?;
        let transaction_status = match self.transaction_status.as_deref() {
            Some(raw) => TransactionStatus::parse(raw)
                .ok_or_else(|| row_error(format!("unknown transaction status '{raw}'")))?,
            None => TransactionStatus::ForSale,
        };
        let area_sq_ft = self
            .area
            .as_deref()
            .map(|raw| {
                raw.parse::<u32>()
                    .map_err(|_| row_error(format!("area '{raw}' is not a whole number")))
            })
            .transpose()?;
        let images = self
            .image_urls
            .as_deref()
            .map(|raw| {
                raw.split('|')
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(ImageInput::url)
                    .collect()
            })
            .unwrap_or_default();

        Ok(ListingDraft {
            title: self.title,
            description: self.description,
            address: self.address,
            city: self.city,
            price: self.price,
            property_type,
            transaction_status,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area_sq_ft,
            images,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
