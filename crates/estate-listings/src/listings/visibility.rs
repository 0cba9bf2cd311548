//! Read-side access control: turns a caller plus requested filters into the
//! predicate, ordering and window a listing query runs with.

use std::cmp::Ordering;

use serde::Serialize;

use super::domain::{Listing, PropertyType, TransactionStatus};
use crate::accounts::AccountId;
use crate::config::ListingConfig;
use crate::error::DomainError;
use crate::principal::{Caller, Role};

/// Filter half of a listing search, handed to `compute_visibility`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilters {
    pub transaction_status: Option<TransactionStatus>,
    pub property_type: Option<PropertyType>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub bedrooms: Option<u8>,
    pub city: Option<String>,
    pub owner: Option<AccountId>,
    pub search: Option<String>,
    pub show_mine: bool,
}

/// Role-derived restriction applied before explicit filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseVisibility {
    /// Published and approved listings only.
    Public,
    /// Every listing of one owner, whatever its publication state.
    OwnedBy(AccountId),
    Unrestricted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPredicate {
    pub base: BaseVisibility,
    pub transaction_status: Option<TransactionStatus>,
    pub property_type: Option<PropertyType>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub bedrooms: Option<u8>,
    city: Option<String>,
    pub owner: Option<AccountId>,
    search: Option<String>,
}

/// Fields the free-text search looks at.
fn search_fields(listing: &Listing) -> [&str; 3] {
    [
        listing.title.as_str(),
        listing.description.as_str(),
        listing.address.as_str(),
    ]
}

impl ListingPredicate {
    pub fn unrestricted() -> Self {
        Self {
            base: BaseVisibility::Unrestricted,
            transaction_status: None,
            property_type: None,
            min_price: None,
            max_price: None,
            bedrooms: None,
            city: None,
            owner: None,
            search: None,
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        let base = match &self.base {
            BaseVisibility::Public => listing.is_public(),
            BaseVisibility::OwnedBy(owner) => listing.is_owned_by(owner),
            BaseVisibility::Unrestricted => true,
        };

        base && self
            .transaction_status
            .map_or(true, |status| listing.transaction_status == status)
            && self
                .property_type
                .map_or(true, |kind| listing.property_type == kind)
            && self.min_price.map_or(true, |min| listing.price >= min)
            && self.max_price.map_or(true, |max| listing.price <= max)
            && self.bedrooms.map_or(true, |beds| listing.bedrooms == beds)
            && self.city.as_deref().map_or(true, |city| {
                contains_folded(&listing.city, city) || contains_folded(&listing.address, city)
            })
            && self
                .owner
                .as_ref()
                .map_or(true, |owner| listing.is_owned_by(owner))
            && self.search.as_deref().map_or(true, |term| {
                search_fields(listing)
                    .iter()
                    .any(|field| contains_folded(field, term))
            })
    }
}

/// `needle` is expected to be lowercased already.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn normalized_term(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
}

/// Effective predicate for a listing read.
///
/// | caller                | showMine | base               |
/// |-----------------------|----------|--------------------|
/// | anonymous, user       | ignored  | public only        |
/// | agent                 | false    | public only        |
/// | agent                 | true     | own, any state     |
/// | admin                 | ignored  | unrestricted       |
pub fn compute_visibility(
    caller: &Caller,
    filters: ListingFilters,
) -> Result<ListingPredicate, DomainError> {
    let base = match caller.principal().filter(|principal| principal.active) {
        Some(principal) if principal.role == Role::Admin => BaseVisibility::Unrestricted,
        Some(principal) if principal.role == Role::Agent && filters.show_mine => {
            BaseVisibility::OwnedBy(principal.id.clone())
        }
        _ => BaseVisibility::Public,
    };

    if let (Some(min), Some(max)) = (filters.min_price, filters.max_price) {
        if min > max {
            return Err(DomainError::validation(
                "minPrice must not exceed maxPrice",
            ));
        }
    }

    Ok(ListingPredicate {
        base,
        transaction_status: filters.transaction_status,
        property_type: filters.property_type,
        min_price: filters.min_price,
        max_price: filters.max_price,
        bedrooms: filters.bedrooms,
        city: normalized_term(filters.city),
        owner: filters.owner,
        search: normalized_term(filters.search),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Price,
    Views,
    Bedrooms,
    Title,
}

impl SortField {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "createdAt" | "created_at" => Some(Self::CreatedAt),
            "price" => Some(Self::Price),
            "views" => Some(Self::Views),
            "bedrooms" => Some(Self::Bedrooms),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    fn compare(self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Price => a.price.cmp(&b.price),
            SortField::Views => a.views.cmp(&b.views),
            SortField::Bedrooms => a.bedrooms.cmp(&b.bedrooms),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

/// Parse `price,-createdAt` style sort strings; an empty one sorts newest first.
pub fn parse_sort(raw: Option<&str>) -> Result<Vec<SortKey>, DomainError> {
    let mut keys = Vec::new();
    for part in raw.unwrap_or_default().split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (descending, name) = match part.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, part.strip_prefix('+').unwrap_or(part)),
        };
        let field = SortField::parse(name)
            .ok_or_else(|| DomainError::validation(format!("cannot sort by '{name}'")))?;
        keys.push(SortKey { field, descending });
    }

    if keys.is_empty() {
        keys.push(SortKey {
            field: SortField::CreatedAt,
            descending: true,
        });
    }
    Ok(keys)
}

/// Total order over listings for the given keys; ties fall back to id, newest first.
pub fn compare_listings(keys: &[SortKey], a: &Listing, b: &Listing) -> Ordering {
    keys.iter()
        .map(|key| {
            let ordering = key.field.compare(a, b);
            if key.descending {
                ordering.reverse()
            } else {
                ordering
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| b.id.cmp(&a.id))
}

/// Validated 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(
        page: Option<u32>,
        limit: Option<u32>,
        config: &ListingConfig,
    ) -> Result<Self, DomainError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(config.default_page_size);
        if page == 0 {
            return Err(DomainError::validation("page must be at least 1"));
        }
        if limit == 0 {
            return Err(DomainError::validation("limit must be at least 1"));
        }
        Ok(Self {
            page,
            limit: limit.min(config.max_page_size),
        })
    }

    pub fn skip(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

/// A query handed to the listing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub predicate: ListingPredicate,
    pub sort: Vec<SortKey>,
    pub skip: usize,
    pub limit: usize,
}

/// One page of results; `total` counts the filtered set before windowing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            has_next: u64::from(request.page) * u64::from(request.limit) < total,
            has_prev: request.page > 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}
