//! Catalog Models

use realty::{catalog::SortOrder, properties::Property};
use serde::Serialize;

/// Listing request as it arrives from a caller; the page size is the
/// service's own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingRequest {
    pub search: Option<String>,
    pub sort: SortOrder,
    pub page: u32,
}

/// A property as shown in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    #[serde(flatten)]
    pub property: Property,
    pub image_url: Option<String>,
}
