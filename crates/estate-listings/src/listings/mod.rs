//! Listing lifecycle: visibility, publication state, ownership rules and the HTTP
//! surface that exposes them.

pub mod assets;
pub mod domain;
pub mod images;
pub mod import;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod service;
pub mod visibility;


pub use assets::AssetUrls;
pub use domain::{
    ImageInput, Listing, ListingDraft, ListingId, ListingImage, ListingUpdate, PropertyType,
    RejectRequest, ReviewRequest, TransactionStatus,
};
pub use images::{ImageStore, ImageStoreError};
pub use import::{ListingCsvImporter, ListingImportError};
pub use lifecycle::PublicationState;
pub use repository::ListingRepository;
pub use router::listing_router;
pub use service::{ListingSearch, ListingService};
pub use visibility::{
    compute_visibility, BaseVisibility, ListingFilters, ListingPredicate, ListingQuery, Page,
    PageRequest, SortField, SortKey,
};
