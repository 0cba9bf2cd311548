//! Integration scenarios for inquiry routing.
//!
//! Inquiries are answered by an admin picked by the responsible-party resolver; these
//! scenarios cover the resolver, the owner snapshot and the HTTP error mapping.

mod common {
    use std::sync::Arc;

    use estate_listings::accounts::{
        Account, AccountId, AccountRepository, LowestIdAdminResolver,
    };
    use estate_listings::config::ListingConfig;
    use estate_listings::favorites::FavoritesService;
    use estate_listings::http::ApiState;
    use estate_listings::inquiries::{Inquiry, InquiryId, InquiryRepository, InquiryService};
    use estate_listings::listings::{
        AssetUrls, ListingDraft, ListingId, ListingService, PropertyType, TransactionStatus,
    };
    use estate_listings::principal::{Role, StaticTokenAuthenticator};
    use estate_listings::repository::RepositoryError;
    use estate_listings::store::{
        InMemoryAccountRepository, InMemoryImageStore, InMemoryInquiryRepository,
        InMemoryListingRepository,
    };

    pub(super) struct UnavailableInquiries;

    impl InquiryRepository for UnavailableInquiries {
        fn insert(&self, _inquiry: Inquiry) -> Result<Inquiry, RepositoryError> {
            Err(RepositoryError::Unavailable("document store offline".to_string()))
        }

        fn update(&self, _inquiry: Inquiry) -> Result<(), RepositoryError> {
            Err(RepositoryError::Unavailable("document store offline".to_string()))
        }

        fn fetch(&self, _id: &InquiryId) -> Result<Option<Inquiry>, RepositoryError> {
            Err(RepositoryError::Unavailable("document store offline".to_string()))
        }

        fn delete(&self, _id: &InquiryId) -> Result<(), RepositoryError> {
            Err(RepositoryError::Unavailable("document store offline".to_string()))
        }

        fn for_listing(&self, _listing: &ListingId) -> Result<Vec<Inquiry>, RepositoryError> {
            Err(RepositoryError::Unavailable("document store offline".to_string()))
        }

        fn for_requester(&self, _requester: &AccountId) -> Result<Vec<Inquiry>, RepositoryError> {
            Err(RepositoryError::Unavailable("document store offline".to_string()))
        }
    }

    pub(super) struct World {
        pub(super) accounts: Arc<InMemoryAccountRepository>,
        pub(super) listings: Arc<ListingService>,
        pub(super) inquiries: Arc<InquiryService>,
        pub(super) state: ApiState,
    }

    pub(super) const BUYER_TOKEN: &str = "buyer";
    pub(super) const ADMIN_TOKEN: &str = "admin";

    pub(super) fn account(id: &str, role: Role) -> Account {
        Account::new(AccountId::from(id), id, format!("{id}@example.com"), role)
    }

    pub(super) fn world(
        admins: &[&str],
        inquiry_store: Arc<dyn InquiryRepository>,
    ) -> World {
        let accounts = Arc::new(InMemoryAccountRepository::default());
        let store = Arc::new(InMemoryListingRepository::default());
        for id in admins {
            accounts.insert(account(id, Role::Admin)).expect("seed admin");
        }
        let others = [
            account("agent-1", Role::Agent),
            account("agent-2", Role::Agent),
            account("buyer-1", Role::User),
        ];
        for seeded in others {
            accounts.insert(seeded).expect("seed account");
        }

        let listings = Arc::new(ListingService::new(
            store.clone(),
            Arc::new(InMemoryImageStore::default()),
            ListingConfig::default(),
        ));
        let inquiries = Arc::new(InquiryService::new(
            inquiry_store,
            store.clone(),
            Arc::new(LowestIdAdminResolver::new(accounts.clone())),
        ));

        let mut auth = StaticTokenAuthenticator::new(accounts.clone())
            .with_token(BUYER_TOKEN, AccountId::from("buyer-1"));
        if let Some(first) = admins.first() {
            auth = auth.with_token(ADMIN_TOKEN, AccountId::from(*first));
        }
        let state = ApiState {
            listings: listings.clone(),
            favorites: Arc::new(FavoritesService::new(accounts.clone(), store)),
            inquiries: inquiries.clone(),
            auth: Arc::new(auth),
            assets: AssetUrls::default(),
        };

        World {
            accounts,
            listings,
            inquiries,
            state,
        }
    }

    pub(super) fn in_memory() -> Arc<dyn InquiryRepository> {
        Arc::new(InMemoryInquiryRepository::default())
    }

    pub(super) fn draft() -> ListingDraft {
        ListingDraft {
            title: "Hill country ranch".to_string(),
            description: "Twelve acres".to_string(),
            address: "4 Ranch Rd".to_string(),
            city: "Dripping Springs".to_string(),
            price: 890_000,
            property_type: PropertyType::Land,
            transaction_status: TransactionStatus::ForSale,
            bedrooms: 0,
            bathrooms: 0,
            area_sq_ft: None,
            images: Vec::new(),
        }
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::*;
use estate_listings::accounts::{AccountId, AccountRepository};
use estate_listings::error::DomainError;
use estate_listings::http::api_router;
use estate_listings::inquiries::{InquiryStatus, NewInquiry};
use estate_listings::listings::{ListingId, ListingUpdate};
use estate_listings::principal::{Caller, Role};
use serde_json::json;
use tower::ServiceExt;

fn caller(world: &World, id: &str) -> Caller {
    let account = world
        .accounts
        .fetch(&AccountId::from(id))
        .expect("fetch")
        .expect("seeded");
    Caller::from(account.principal())
}

fn ask(listing_id: &ListingId) -> NewInquiry {
    NewInquiry {
        listing_id: listing_id.clone(),
        message: "Is there well water?".to_string(),
    }
}

#[test]
fn no_admin_means_no_inquiry() {
    let world = world(&[], in_memory());
    let listing = world
        .listings
        .create(&caller(&world, "agent-1"), draft())
        .expect("agent creates");

    let err = world
        .inquiries
        .create(&caller(&world, "buyer-1"), ask(&listing.id))
        .expect_err("no admin to route to");
    assert!(matches!(err, DomainError::DependencyUnavailable(_)));
}

#[test]
fn lowest_id_admin_handles_and_owner_snapshot_is_frozen() {
    let world = world(&["admin-b", "admin-a"], in_memory());
    let agent = caller(&world, "agent-1");
    let admin = caller(&world, "admin-b");
    let listing = world.listings.create(&agent, draft()).expect("agent creates");

    let view = world
        .inquiries
        .create(&caller(&world, "buyer-1"), ask(&listing.id))
        .expect("buyer asks");
    assert_eq!(view.handler, Some(AccountId::from("admin-a")));
    assert_eq!(view.inquiry.original_owner, AccountId::from("agent-1"));

    world
        .listings
        .update(
            &admin,
            &listing.id,
            ListingUpdate {
                owner: Some(AccountId::from("agent-2")),
                ..ListingUpdate::default()
            },
        )
        .expect("admin reassigns");

    let views = world
        .inquiries
        .list_for_listing(&admin, &listing.id)
        .expect("admin lists");
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].inquiry.original_owner, AccountId::from("agent-1"));
}

#[test]
fn pending_can_close_directly_and_stays_closed() {
    let world = world(&["admin-a"], in_memory());
    let admin = caller(&world, "admin-a");
    let listing = world
        .listings
        .create(&caller(&world, "agent-1"), draft())
        .expect("agent creates");
    let view = world
        .inquiries
        .create(&caller(&world, "buyer-1"), ask(&listing.id))
        .expect("buyer asks");

    let closed = world
        .inquiries
        .set_status(&admin, &view.inquiry.id, "closed")
        .expect("admin closes");
    assert_eq!(closed.inquiry.status, InquiryStatus::Closed);
    assert_eq!(closed.inquiry.response, None);

    assert!(matches!(
        world.inquiries.respond(&admin, &view.inquiry.id, "Yes"),
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn http_create_then_forbidden_listing_scan() {
    let world = world(&["admin-a"], in_memory());
    let listing = world
        .listings
        .create(&caller(&world, "agent-1"), draft())
        .expect("agent creates");
    let router = api_router(world.state.clone());

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/inquiries")
                .header(header::AUTHORIZATION, format!("Bearer {BUYER_TOKEN}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&json!({
                        "listingId": listing.id.0,
                        "message": "Any easements?"
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(
            Request::get(format!("/api/v1/listings/{}/inquiries", listing.id))
                .header(header::AUTHORIZATION, format!("Bearer {BUYER_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn store_outage_surfaces_as_internal_error() {
    let world = world(&["admin-a"], Arc::new(UnavailableInquiries));
    let response = api_router(world.state.clone())
        .oneshot(
            Request::get("/api/v1/inquiries/mine")
                .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let admin = Caller::from(account("admin-a", Role::Admin).principal());
    assert!(matches!(
        world.inquiries.list_own(&admin),
        Err(DomainError::Internal(_))
    ));
}
