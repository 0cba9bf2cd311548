//! Buyer-to-operator inquiries about a listing, handled by an admin.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Inquiry, InquiryId, InquiryReply, InquiryStatus, InquiryView, NewInquiry, StatusChange,
};
pub use repository::InquiryRepository;
pub use router::inquiry_router;
pub use service::InquiryService;
