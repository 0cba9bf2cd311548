use std::collections::HashSet;

use super::domain::{ImageInput, ListingId, ListingImage};
use crate::error::DomainError;

/// Binary storage collaborator. Uploading happens upstream; this core only asks it
/// to drop assets it no longer references.
pub trait ImageStore: Send + Sync {
    fn discard(&self, public_ids: &[String]) -> Result<(), ImageStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("image storage unavailable: {0}")]
    Unavailable(String),
}

/// Turn caller-supplied references into stored pairs, synthesizing stable handles
/// for images that arrive without one.
pub(crate) fn resolve_images(
    listing: &ListingId,
    inputs: Vec<ImageInput>,
) -> Result<Vec<ListingImage>, DomainError> {
    let mut seen = HashSet::new();
    let mut images = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.into_iter().enumerate() {
        let url = input.url.trim().to_string();
        if url.is_empty() {
            return Err(DomainError::validation(format!(
                "image {index} is missing a url"
            )));
        }

        let public_id = match input.public_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => id.trim().to_string(),
            None => synthesize_public_id(listing, &url, index),
        };
        if !seen.insert(public_id.clone()) {
            return Err(DomainError::validation(format!(
                "duplicate image public_id '{public_id}'"
            )));
        }

        images.push(ListingImage { url, public_id });
    }

    Ok(images)
}

fn synthesize_public_id(listing: &ListingId, url: &str, index: usize) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or_default();
    let stem = file.split('.').next().unwrap_or_default();
    let stem: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if stem.is_empty() {
        format!("listings/{listing}/image-{index}")
    } else {
        format!("listings/{listing}/{index}-{stem}")
    }
}

/// Public ids present in `before` but absent from `after`.
pub(crate) fn dropped_public_ids(before: &[ListingImage], after: &[ListingImage]) -> Vec<String> {
    let kept: HashSet<&str> = after.iter().map(|image| image.public_id.as_str()).collect();
    before
        .iter()
        .filter(|image| !kept.contains(image.public_id.as_str()))
        .map(|image| image.public_id.clone())
        .collect()
}
