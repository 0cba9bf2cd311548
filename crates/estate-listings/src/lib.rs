//! Listing lifecycle and access-control engine for a real-estate listing service.
//!
//! The crate decides which publication state a listing is in, who may see or change
//! it, how saved favorites behave, and how inquiries are routed to an admin. Storage,
//! credentials and image hosting sit behind traits.

pub mod accounts;
pub mod config;
pub mod error;
pub mod favorites;
pub mod http;
pub mod inquiries;
pub mod listings;
pub mod principal;
pub mod repository;
pub mod store;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
