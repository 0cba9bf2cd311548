use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;

use crate::accounts::{Account, AccountId, AccountRepository, LowestIdAdminResolver};
use crate::error::DomainError;
use crate::inquiries::{Inquiry, InquiryId, InquiryRepository, InquiryService, InquiryStatus, NewInquiry};
use crate::listings::{ListingId, ListingUpdate};
use crate::principal::{Caller, Role};
use crate::repository::RepositoryError;
use crate::store::{InMemoryInquiryRepository, InMemoryListingRepository};
use crate::test_support::{principal, Fixture};

/// Account store that is down for every call.
struct UnreachableAccounts;

impl AccountRepository for UnreachableAccounts {
    fn insert(&self, _account: Account) -> Result<Account, RepositoryError> {
        Err(RepositoryError::Unavailable("accounts offline".to_string()))
    }

    fn update(&self, _account: Account) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("accounts offline".to_string()))
    }

    fn fetch(&self, _id: &AccountId) -> Result<Option<Account>, RepositoryError> {
        Err(RepositoryError::Unavailable("accounts offline".to_string()))
    }

    fn set_favorites(
        &self,
        _id: &AccountId,
        _favorites: BTreeSet<ListingId>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("accounts offline".to_string()))
    }

    fn with_role(&self, _role: Role) -> Result<Vec<Account>, RepositoryError> {
        Err(RepositoryError::Unavailable("accounts offline".to_string()))
    }
}

fn ask(listing_id: &ListingId) -> NewInquiry {
    NewInquiry {
        listing_id: listing_id.clone(),
        message: "Is the garage included?".to_string(),
    }
}

#[test]
fn inquiry_routes_to_admin_not_listing_owner() {
    let fx = Fixture::new();
    let listing = fx.published_listing("Ranch");

    let view = fx
        .inquiries
        .create(&fx.buyer_caller(), ask(&listing.id))
        .expect("buyer asks");

    assert_eq!(view.inquiry.status, InquiryStatus::Pending);
    assert_eq!(view.inquiry.requester, fx.buyer.id);
    assert_eq!(view.inquiry.original_owner, fx.agent.id);
    assert_eq!(view.handler, Some(fx.admin.id.clone()));
    assert_ne!(view.handler, Some(fx.agent.id.clone()));
}

#[test]
fn create_fails_without_an_admin_and_stores_nothing() {
    let fx = Fixture::without_admin();
    let listing = fx.pending_listing("Ranch");

    let err = fx
        .inquiries
        .create(&fx.buyer_caller(), ask(&listing.id))
        .expect_err("no handler available");
    assert!(matches!(err, DomainError::DependencyUnavailable(_)));
    assert!(fx
        .inquiries
        .list_own(&fx.buyer_caller())
        .expect("list own")
        .is_empty());
}

#[test]
fn create_validates_caller_message_and_listing() {
    let fx = Fixture::new();
    let listing = fx.published_listing("Ranch");

    assert!(matches!(
        fx.inquiries.create(&Caller::Anonymous, ask(&listing.id)),
        Err(DomainError::Authentication(_))
    ));
    let blank = NewInquiry {
        listing_id: listing.id.clone(),
        message: "   ".to_string(),
    };
    assert!(matches!(
        fx.inquiries.create(&fx.buyer_caller(), blank),
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        fx.inquiries
            .create(&fx.buyer_caller(), ask(&ListingId::from("lst-missing"))),
        Err(DomainError::NotFound { .. })
    ));
}

#[test]
fn original_owner_survives_ownership_transfer() {
    let fx = Fixture::new();
    let listing = fx.published_listing("Ranch");
    let view = fx
        .inquiries
        .create(&fx.buyer_caller(), ask(&listing.id))
        .expect("buyer asks");

    fx.listing_service
        .update(
            &fx.admin_caller(),
            &listing.id,
            ListingUpdate {
                owner: Some(fx.other_agent.id.clone()),
                ..ListingUpdate::default()
            },
        )
        .expect("admin reassigns");

    let reread = fx
        .inquiries
        .get(&fx.admin_caller(), &view.inquiry.id)
        .expect("admin reads");
    assert_eq!(reread.inquiry.original_owner, fx.agent.id);
}

#[test]
fn respond_and_status_changes_are_admin_only() {
    let fx = Fixture::new();
    let listing = fx.published_listing("Ranch");
    let id = fx
        .inquiries
        .create(&fx.buyer_caller(), ask(&listing.id))
        .expect("buyer asks")
        .inquiry
        .id;

    assert!(matches!(
        fx.inquiries.respond(&fx.agent_caller(), &id, "Yes"),
        Err(DomainError::Authorization(_))
    ));
    assert!(matches!(
        fx.inquiries.set_status(&fx.buyer_caller(), &id, "closed"),
        Err(DomainError::Authorization(_))
    ));
    assert!(matches!(
        fx.inquiries.respond(&fx.admin_caller(), &id, "  "),
        Err(DomainError::Validation(_))
    ));

    let responded = fx
        .inquiries
        .respond(&fx.admin_caller(), &id, "Yes, two cars")
        .expect("admin responds");
    assert_eq!(responded.inquiry.status, InquiryStatus::Responded);
    assert_eq!(responded.inquiry.response.as_deref(), Some("Yes, two cars"));
    assert!(responded.inquiry.responded_at.is_some());
}

#[test]
fn closed_inquiries_are_terminal() {
    let fx = Fixture::new();
    let listing = fx.published_listing("Ranch");
    let id = fx
        .inquiries
        .create(&fx.buyer_caller(), ask(&listing.id))
        .expect("buyer asks")
        .inquiry
        .id;

    assert!(matches!(
        fx.inquiries.set_status(&fx.admin_caller(), &id, "archived"),
        Err(DomainError::Validation(_))
    ));

    let closed = fx
        .inquiries
        .set_status(&fx.admin_caller(), &id, "closed")
        .expect("admin closes");
    assert_eq!(closed.inquiry.status, InquiryStatus::Closed);

    fx.inquiries
        .set_status(&fx.admin_caller(), &id, "closed")
        .expect("closing again is a no-op");
    assert!(matches!(
        fx.inquiries.set_status(&fx.admin_caller(), &id, "pending"),
        Err(DomainError::Validation(_))
    ));
    assert!(matches!(
        fx.inquiries.respond(&fx.admin_caller(), &id, "Too late"),
        Err(DomainError::Validation(_))
    ));
}

#[test]
fn listing_inquiries_are_admin_only_and_own_list_is_per_requester() {
    let fx = Fixture::new();
    let listing = fx.published_listing("Ranch");
    fx.inquiries
        .create(&fx.buyer_caller(), ask(&listing.id))
        .expect("buyer asks");
    fx.inquiries
        .create(&fx.other_agent_caller(), ask(&listing.id))
        .expect("agent asks");

    assert!(matches!(
        fx.inquiries.list_for_listing(&fx.agent_caller(), &listing.id),
        Err(DomainError::Authorization(_))
    ));
    let all = fx
        .inquiries
        .list_for_listing(&fx.admin_caller(), &listing.id)
        .expect("admin lists");
    assert_eq!(all.len(), 2);
    assert!(all
        .iter()
        .all(|view| view.handler == Some(fx.admin.id.clone())));

    let own = fx.inquiries.list_own(&fx.buyer_caller()).expect("own list");
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].inquiry.requester, fx.buyer.id);
}

#[test]
fn get_is_limited_to_requester_and_admin_and_delete_to_admin() {
    let fx = Fixture::new();
    let listing = fx.published_listing("Ranch");
    let id = fx
        .inquiries
        .create(&fx.buyer_caller(), ask(&listing.id))
        .expect("buyer asks")
        .inquiry
        .id;

    fx.inquiries.get(&fx.buyer_caller(), &id).expect("requester reads");
    assert!(matches!(
        fx.inquiries.get(&fx.agent_caller(), &id),
        Err(DomainError::Authorization(_))
    ));
    assert!(matches!(
        fx.inquiries.delete(&fx.buyer_caller(), &id),
        Err(DomainError::Authorization(_))
    ));

    fx.inquiries.delete(&fx.admin_caller(), &id).expect("admin deletes");
    assert!(matches!(
        fx.inquiries.get(&fx.admin_caller(), &id),
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        fx.inquiries
            .delete(&fx.admin_caller(), &InquiryId::from("inq-missing")),
        Err(DomainError::NotFound { .. })
    ));
}

#[test]
fn handler_is_resolved_at_read_time() {
    let fx = Fixture::without_admin();
    let listing = fx.pending_listing("Ranch");
    let earlier_admin = Account::new(
        AccountId::from("acc-000"),
        "Early Admin",
        "early@example.com",
        Role::Admin,
    );
    fx.accounts.insert(earlier_admin.clone()).expect("seed admin");

    let view = fx
        .inquiries
        .create(&fx.buyer_caller(), ask(&listing.id))
        .expect("buyer asks");
    assert_eq!(view.handler, Some(earlier_admin.id.clone()));

    let mut retired = earlier_admin;
    retired.active = false;
    fx.accounts.update(retired).expect("deactivate");
    let reread = fx
        .inquiries
        .get(&fx.buyer_caller(), &view.inquiry.id)
        .expect("requester reads");
    assert_eq!(reread.handler, None);
}

#[test]
fn account_store_outage_fails_reads_instead_of_dropping_the_handler() {
    let store = Arc::new(InMemoryInquiryRepository::default());
    let stored = store
        .insert(Inquiry {
            id: InquiryId::from("inq-outage"),
            listing: ListingId::from("lst-1"),
            requester: AccountId::from("acc-004"),
            original_owner: AccountId::from("acc-002"),
            status: InquiryStatus::Pending,
            message: "Still available?".to_string(),
            response: None,
            responded_at: None,
            created_at: Utc::now(),
        })
        .expect("seed inquiry");
    let service = InquiryService::new(
        store,
        Arc::new(InMemoryListingRepository::default()),
        Arc::new(LowestIdAdminResolver::new(Arc::new(UnreachableAccounts))),
    );
    let requester = principal("acc-004", Role::User);

    assert!(matches!(
        service.get(&requester, &stored.id),
        Err(DomainError::Internal(_))
    ));
    assert!(matches!(
        service.list_own(&requester),
        Err(DomainError::Internal(_))
    ));
}
