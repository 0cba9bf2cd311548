//! Shared fixtures for unit tests across the listing, favorites and inquiry modules.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use serde_json::Value;

use crate::accounts::{Account, AccountId, AccountRepository, LowestIdAdminResolver};
use crate::config::ListingConfig;
use crate::favorites::FavoritesService;
use crate::http::{api_router, ApiState};
use crate::inquiries::InquiryService;
use crate::listings::{
    AssetUrls, Listing, ListingDraft, ListingId, ListingService, PropertyType, TransactionStatus,
};
use crate::principal::{Caller, Principal, Role, StaticTokenAuthenticator};
use crate::store::{
    InMemoryAccountRepository, InMemoryImageStore, InMemoryInquiryRepository,
    InMemoryListingRepository,
};

pub(crate) const ADMIN_TOKEN: &str = "admin-token";
pub(crate) const AGENT_TOKEN: &str = "agent-token";
pub(crate) const OTHER_AGENT_TOKEN: &str = "other-agent-token";
pub(crate) const BUYER_TOKEN: &str = "buyer-token";

pub(crate) fn sample_listing(id: &str, owner: &str) -> Listing {
    let now = Utc::now();
    Listing {
        id: ListingId::from(id),
        owner: AccountId::from(owner),
        title: "Craftsman bungalow".to_string(),
        description: "Deep porch, original trim".to_string(),
        address: "400 Congress Ave".to_string(),
        city: "Austin".to_string(),
        price: 350_000,
        property_type: PropertyType::House,
        transaction_status: TransactionStatus::ForSale,
        bedrooms: 3,
        bathrooms: 2,
        area_sq_ft: Some(1_600),
        images: Vec::new(),
        published: false,
        approved: false,
        rejection_reason: None,
        views: 0,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn draft(title: &str, city: &str, price: u64) -> ListingDraft {
    ListingDraft {
        title: title.to_string(),
        description: format!("{title} with a view"),
        address: format!("12 Main St, {city}"),
        city: city.to_string(),
        price,
        property_type: PropertyType::House,
        transaction_status: TransactionStatus::ForSale,
        bedrooms: 3,
        bathrooms: 2,
        area_sq_ft: None,
        images: Vec::new(),
    }
}

/// Fully wired services over fresh in-memory stores with one admin, two agents and
/// one buyer.
pub(crate) struct Fixture {
    pub(crate) accounts: Arc<InMemoryAccountRepository>,
    pub(crate) listings: Arc<InMemoryListingRepository>,
    pub(crate) images: Arc<InMemoryImageStore>,
    pub(crate) listing_service: Arc<ListingService>,
    pub(crate) favorites: Arc<FavoritesService>,
    pub(crate) inquiries: Arc<InquiryService>,
    pub(crate) admin: Account,
    pub(crate) agent: Account,
    pub(crate) other_agent: Account,
    pub(crate) buyer: Account,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::build(true)
    }

    pub(crate) fn without_admin() -> Self {
        Self::build(false)
    }

    fn build(with_admin: bool) -> Self {
        let accounts = Arc::new(InMemoryAccountRepository::default());
        let listings = Arc::new(InMemoryListingRepository::default());
        let inquiry_store = Arc::new(InMemoryInquiryRepository::default());
        let images = Arc::new(InMemoryImageStore::default());

        let admin = Account::new(AccountId::from("acc-001"), "Ada Admin", "ada@example.com", Role::Admin);
        let agent = Account::new(AccountId::from("acc-002"), "Alex Agent", "alex@example.com", Role::Agent);
        let other_agent =
            Account::new(AccountId::from("acc-003"), "Olly Agent", "olly@example.com", Role::Agent);
        let buyer = Account::new(AccountId::from("acc-004"), "Bea Buyer", "bea@example.com", Role::User);
        if with_admin {
            accounts.insert(admin.clone()).expect("seed admin");
        }
        for account in [&agent, &other_agent, &buyer] {
            accounts.insert(account.clone()).expect("seed account");
        }

        let listing_service = Arc::new(ListingService::new(
            listings.clone(),
            images.clone(),
            ListingConfig::default(),
        ));
        let favorites = Arc::new(FavoritesService::new(accounts.clone(), listings.clone()));
        let inquiries = Arc::new(InquiryService::new(
            inquiry_store,
            listings.clone(),
            Arc::new(LowestIdAdminResolver::new(accounts.clone())),
        ));

        Self {
            accounts,
            listings,
            images,
            listing_service,
            favorites,
            inquiries,
            admin,
            agent,
            other_agent,
            buyer,
        }
    }

    pub(crate) fn admin_caller(&self) -> Caller {
        Caller::from(self.admin.principal())
    }

    pub(crate) fn agent_caller(&self) -> Caller {
        Caller::from(self.agent.principal())
    }

    pub(crate) fn other_agent_caller(&self) -> Caller {
        Caller::from(self.other_agent.principal())
    }

    pub(crate) fn buyer_caller(&self) -> Caller {
        Caller::from(self.buyer.principal())
    }

    /// Agent-authored listing that an admin has approved.
    pub(crate) fn published_listing(&self, title: &str) -> Listing {
        let listing = self
            .listing_service
            .create(&self.agent_caller(), draft(title, "Austin", 300_000))
            .expect("agent creates listing");
        self.listing_service
            .approve(&self.admin_caller(), &listing.id)
            .expect("admin approves listing")
    }

    pub(crate) fn pending_listing(&self, title: &str) -> Listing {
        self.listing_service
            .create(&self.agent_caller(), draft(title, "Austin", 300_000))
            .expect("agent creates listing")
    }

    pub(crate) fn router(&self, assets: AssetUrls) -> Router {
        let auth = StaticTokenAuthenticator::new(self.accounts.clone())
            .with_token(ADMIN_TOKEN, self.admin.id.clone())
            .with_token(AGENT_TOKEN, self.agent.id.clone())
            .with_token(OTHER_AGENT_TOKEN, self.other_agent.id.clone())
            .with_token(BUYER_TOKEN, self.buyer.id.clone());

        api_router(ApiState {
            listings: self.listing_service.clone(),
            favorites: self.favorites.clone(),
            inquiries: self.inquiries.clone(),
            auth: Arc::new(auth),
            assets,
        })
    }
}

pub(crate) fn principal(id: &str, role: Role) -> Caller {
    Caller::from(Principal::new(AccountId::from(id), role))
}

/// Builds an API request, optionally authenticated and with a JSON body.
pub(crate) fn api_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
