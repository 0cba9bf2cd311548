use crate::infra::Platform;
use clap::Args;
use estate_listings::config::ListingConfig;
use estate_listings::error::AppError;
use estate_listings::inquiries::NewInquiry;
use estate_listings::listings::{
    ImageInput, Listing, ListingDraft, ListingSearch, ListingUpdate, PropertyType,
    PublicationState, TransactionStatus,
};
use estate_listings::principal::Caller;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// City used for the demo listing and the anonymous search
    #[arg(long, default_value = "Austin")]
    pub(crate) city: String,
    /// Asking price of the demo listing
    #[arg(long, default_value_t = 425_000)]
    pub(crate) price: u64,
    /// Skip the inquiry portion of the demo.
    #[arg(long)]
    pub(crate) skip_inquiry: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let platform = Platform::in_memory(ListingConfig::default())?;
    let admin = platform.demo.admin.caller();
    let agent = platform.demo.agent.caller();
    let buyer = platform.demo.user.caller();

    println!("Listing lifecycle demo");
    println!(
        "Accounts: admin={} agent={} user={}",
        platform.demo.admin.account.id, platform.demo.agent.account.id, platform.demo.user.account.id
    );

    let draft = ListingDraft {
        title: "Craftsman bungalow".to_string(),
        description: "Shaded porch, two blocks from the park".to_string(),
        address: format!("1208 Elm St, {}", args.city),
        city: args.city.clone(),
        price: args.price,
        property_type: PropertyType::House,
        transaction_status: TransactionStatus::ForSale,
        bedrooms: 3,
        bathrooms: 2,
        area_sq_ft: Some(1_650),
        images: vec![
            ImageInput::url("/uploads/bungalow-front.jpg"),
            ImageInput::url("/uploads/bungalow-kitchen.jpg"),
        ],
    };

    let listing = platform.listings.create(&agent, draft)?;
    print_step("Agent created listing", &listing);

    let public = visible_count(&platform, &Caller::Anonymous, &args.city)?;
    println!("  Anonymous search in {} sees {} listing(s)", args.city, public);

    let listing = platform.listings.approve(&admin, &listing.id)?;
    print_step("Admin approved listing", &listing);

    let public = visible_count(&platform, &Caller::Anonymous, &args.city)?;
    println!("  Anonymous search in {} sees {} listing(s)", args.city, public);

    let detail = platform.listings.get(&buyer, &listing.id)?;
    println!("  Buyer opened the detail page (views: {})", detail.views);

    let update = ListingUpdate {
        price: Some(args.price.saturating_sub(10_000).max(1)),
        images: Some(
            listing
                .images
                .iter()
                .take(1)
                .map(|image| ImageInput {
                    url: image.url.clone(),
                    public_id: Some(image.public_id.clone()),
                })
                .collect(),
        ),
        ..ListingUpdate::default()
    };
    let listing = platform.listings.update(&agent, &listing.id, update)?;
    print_step("Agent cut the price and dropped a photo", &listing);
    println!("  Released images: {}", platform.images.discarded().join(", "));

    let listing = platform.listings.reject(
        &admin,
        &listing.id,
        Some("Add a floor plan before relisting".to_string()),
    )?;
    print_step("Admin rejected the edit", &listing);

    let listing = platform.listings.approve(&admin, &listing.id)?;
    print_step("Admin approved the revision", &listing);

    let toggle = platform.favorites.toggle(&buyer, &listing.id)?;
    println!(
        "  Buyer favorite toggled: is_favorite={} ({} saved)",
        toggle.is_favorite,
        toggle.favorites.len()
    );

    if args.skip_inquiry {
        return Ok(());
    }

    println!("\nInquiry workflow");
    let view = platform.inquiries.create(
        &buyer,
        NewInquiry {
            listing_id: listing.id.clone(),
            message: "Is the detached garage included?".to_string(),
        },
    )?;
    println!(
        "  Buyer asked {} (handler: {}, listing owner at the time: {})",
        view.inquiry.id,
        view.handler
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "none".to_string()),
        view.inquiry.original_owner
    );

    let view = platform
        .inquiries
        .respond(&admin, &view.inquiry.id, "Yes, with a separate workshop.")?;
    println!("  Admin responded: status={}", view.inquiry.status.label());

    let view = platform
        .inquiries
        .set_status(&admin, &view.inquiry.id, "closed")?;
    println!("  Admin closed the inquiry: status={}", view.inquiry.status.label());

    Ok(())
}

fn visible_count(platform: &Platform, caller: &Caller, city: &str) -> Result<u64, AppError> {
    let search = ListingSearch {
        city: Some(city.to_string()),
        ..ListingSearch::default()
    };
    Ok(platform.listings.list(caller, search)?.total)
}

fn print_step(label: &str, listing: &Listing) {
    println!(
        "- {label}: {} [{}] published={} approved={} price={}{}",
        listing.id,
        PublicationState::of(listing).label(),
        listing.published,
        listing.approved,
        listing.price,
        listing
            .rejection_reason
            .as_deref()
            .map(|reason| format!(" reason=\"{reason}\""))
            .unwrap_or_default()
    );
}
