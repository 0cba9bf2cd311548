//! Saved-listing sets: strict add and remove, a flipping toggle, and a resolved read
//! view that tolerates deleted listings.

pub mod router;
pub mod service;

pub use router::favorites_router;
pub use service::{FavoriteToggle, FavoritesService};
