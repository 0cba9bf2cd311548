use super::domain::Listing;

/// Response-side URL rewriting. Applied once to outgoing views; stored documents
/// keep the URLs exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetUrls {
    base: Option<String>,
}

impl AssetUrls {
    pub fn new(base: Option<String>) -> Self {
        Self {
            base: base.map(|value| value.trim_end_matches('/').to_string()),
        }
    }

    pub fn rewrite(&self, url: &str) -> String {
        match &self.base {
            Some(base) if url.starts_with('/') && !url.starts_with("//") => {
                format!("{base}{url}")
            }
            _ => url.to_string(),
        }
    }

    pub fn listing(&self, mut listing: Listing) -> Listing {
        for image in &mut listing.images {
            image.url = self.rewrite(&image.url);
        }
        listing
    }
}
