use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use estate_listings::accounts::{Account, AccountId, AccountRepository, LowestIdAdminResolver};
use estate_listings::config::ListingConfig;
use estate_listings::error::DomainError;
use estate_listings::favorites::FavoritesService;
use estate_listings::http::ApiState;
use estate_listings::inquiries::InquiryService;
use estate_listings::listings::{AssetUrls, ListingService};
use estate_listings::principal::{Caller, Role, StaticTokenAuthenticator};
use estate_listings::store::{
    InMemoryAccountRepository, InMemoryImageStore, InMemoryInquiryRepository,
    InMemoryListingRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Seeded account plus the bearer token that authenticates as it.
#[derive(Debug, Clone)]
pub(crate) struct DemoAccount {
    pub(crate) account: Account,
    pub(crate) token: &'static str,
}

impl DemoAccount {
    pub(crate) fn caller(&self) -> Caller {
        Caller::from(self.account.principal())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct DemoAccounts {
    pub(crate) admin: DemoAccount,
    pub(crate) agent: DemoAccount,
    pub(crate) user: DemoAccount,
}

impl DemoAccounts {
    pub(crate) fn all(&self) -> [&DemoAccount; 3] {
        [&self.admin, &self.agent, &self.user]
    }
}

fn demo_account(
    id: &str,
    name: &str,
    email: &str,
    role: Role,
    token: &'static str,
) -> DemoAccount {
    DemoAccount {
        account: Account::new(AccountId::from(id), name, email, role),
        token,
    }
}

pub(crate) fn seed_accounts(accounts: &dyn AccountRepository) -> Result<DemoAccounts, DomainError> {
    let seeded = DemoAccounts {
        admin: demo_account(
            "acc-admin",
            "Operations Admin",
            "admin@listings.local",
            Role::Admin,
            "demo-admin-token",
        ),
        agent: demo_account(
            "acc-agent",
            "Listing Agent",
            "agent@listings.local",
            Role::Agent,
            "demo-agent-token",
        ),
        user: demo_account(
            "acc-user",
            "Prospective Buyer",
            "buyer@listings.local",
            Role::User,
            "demo-user-token",
        ),
    };

    for demo in seeded.all() {
        accounts.insert(demo.account.clone())?;
    }
    Ok(seeded)
}

/// In-memory stores and the services wired over them.
pub(crate) struct Platform {
    pub(crate) accounts: Arc<InMemoryAccountRepository>,
    pub(crate) images: Arc<InMemoryImageStore>,
    pub(crate) listings: Arc<ListingService>,
    pub(crate) favorites: Arc<FavoritesService>,
    pub(crate) inquiries: Arc<InquiryService>,
    pub(crate) demo: DemoAccounts,
}

impl Platform {
    pub(crate) fn in_memory(config: ListingConfig) -> Result<Self, DomainError> {
        let accounts = Arc::new(InMemoryAccountRepository::default());
        let listing_store = Arc::new(InMemoryListingRepository::default());
        let images = Arc::new(InMemoryImageStore::default());

        let demo = seed_accounts(accounts.as_ref())?;

        let listings = Arc::new(ListingService::new(
            listing_store.clone(),
            images.clone(),
            config,
        ));
        let favorites = Arc::new(FavoritesService::new(
            accounts.clone(),
            listing_store.clone(),
        ));
        let inquiries = Arc::new(InquiryService::new(
            Arc::new(InMemoryInquiryRepository::default()),
            listing_store,
            Arc::new(LowestIdAdminResolver::new(accounts.clone())),
        ));

        Ok(Self {
            accounts,
            images,
            listings,
            favorites,
            inquiries,
            demo,
        })
    }

    pub(crate) fn api_state(&self, assets: AssetUrls) -> ApiState {
        let auth = self
            .demo
            .all()
            .into_iter()
            .fold(
                StaticTokenAuthenticator::new(self.accounts.clone()),
                |auth, demo| auth.with_token(demo.token, demo.account.id.clone()),
            );

        ApiState {
            listings: self.listings.clone(),
            favorites: self.favorites.clone(),
            inquiries: self.inquiries.clone(),
            auth: Arc::new(auth),
            assets,
        }
    }
}
