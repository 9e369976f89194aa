//! Demo catalog.
//!
//! Four listings, one per property kind, for local runs and tests.

use realty::properties::{NewProperty, PropertyKind, PropertyUuid};
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::catalog::{
    CatalogService, CatalogServiceError,
    models::{Listing, ListingRequest},
};

pub const APARTMENT_NAME: &str = "Two-room flat on Tverskaya";
pub const HOUSE_NAME: &str = "Country house in Barvikha";
pub const COMMERCIAL_NAME: &str = "Office space on Arbat";
pub const LAND_NAME: &str = "Building plot near Istra";

pub fn new_apartment() -> NewProperty {
    NewProperty {
        uuid: PropertyUuid::new(),
        name: APARTMENT_NAME.to_string(),
        description: "Renovated flat with a view of the boulevard".to_string(),
        price: Decimal::new(8_500_000, 0),
        area: Decimal::new(6_450, 2),
        address: "Tverskaya St 15, Moscow".to_string(),
        rooms: 2,
        floor: Some(7),
        total_floors: Some(12),
        kind: PropertyKind::Apartment,
        image_key: Some("flats/tverskaya.jpg".to_string()),
    }
}

pub fn new_house() -> NewProperty {
    NewProperty {
        uuid: PropertyUuid::new(),
        name: HOUSE_NAME.to_string(),
        description: "Two storeys with a garden and sauna".to_string(),
        price: Decimal::new(15_000_000, 0),
        area: Decimal::new(210, 0),
        address: "Barvikha village 4, Moscow Oblast".to_string(),
        rooms: 5,
        floor: None,
        total_floors: Some(2),
        kind: PropertyKind::House,
        image_key: None,
    }
}

pub fn new_commercial() -> NewProperty {
    NewProperty {
        uuid: PropertyUuid::new(),
        name: COMMERCIAL_NAME.to_string(),
        description: "Ground floor retail unit with street frontage".to_string(),
        price: Decimal::new(12_000_000, 0),
        area: Decimal::new(9_800, 2),
        address: "Arbat St 22, Moscow".to_string(),
        rooms: 3,
        floor: Some(1),
        total_floors: Some(5),
        kind: PropertyKind::Commercial,
        image_key: Some("commercial/arbat.jpg".to_string()),
    }
}

pub fn new_land() -> NewProperty {
    NewProperty {
        uuid: PropertyUuid::new(),
        name: LAND_NAME.to_string(),
        description: "Fifteen sotka plot with road access".to_string(),
        price: Decimal::new(3_500_000, 0),
        area: Decimal::new(1_500, 0),
        address: "Istra district, Moscow Oblast".to_string(),
        rooms: 0,
        floor: None,
        total_floors: None,
        kind: PropertyKind::Land,
        image_key: None,
    }
}

/// Every demo listing, cheapest last.
#[must_use]
pub fn demo_properties() -> Vec<NewProperty> {
    vec![new_house(), new_commercial(), new_apartment(), new_land()]
}

/// Add the demo listings unless the catalog already shows something.
/// Returns the listings created, which is empty when seeding was skipped.
///
/// # Errors
///
/// Returns the first [`CatalogServiceError`] raised while listing or
/// creating properties.
#[tracing::instrument(name = "seed.catalog", skip(catalog), err)]
pub async fn seed_catalog(
    catalog: &dyn CatalogService,
) -> Result<Vec<Listing>, CatalogServiceError> {
    let existing = catalog.list_properties(ListingRequest::default()).await?;

    if existing.total > 0 {
        info!(existing = existing.total, "catalog already populated, skipping seed");

        return Ok(Vec::new());
    }

    let mut created = Vec::new();

    for property in demo_properties() {
        created.push(catalog.create_property(property).await?);
    }

    info!(created = created.len(), "seeded demo catalog");

    Ok(created)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use crate::{context::AppContext, repositories::MemoryStore};

    use super::*;

    fn context() -> AppContext {
        let store = Arc::new(MemoryStore::new());

        AppContext::from_repositories(store.clone(), store, None, 3)
    }

    #[test]
    fn demo_properties_are_valid() -> TestResult {
        for property in demo_properties() {
            property.validate()?;
        }

        Ok(())
    }

    #[tokio::test]
    async fn seeds_an_empty_catalog_once() -> TestResult {
        let ctx = context();

        let created = seed_catalog(ctx.catalog.as_ref()).await?;
        let again = seed_catalog(ctx.catalog.as_ref()).await?;

        let page = ctx.catalog.list_properties(ListingRequest::default()).await?;

        assert_eq!(created.len(), 4);
        assert!(again.is_empty());
        assert_eq!(page.total, 4);

        Ok(())
    }
}
