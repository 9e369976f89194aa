//! Catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use realty::{
    catalog::{CatalogQuery, Page},
    properties::{NewProperty, Property, PropertyUuid},
};
use tracing::{Span, info};

use crate::{
    domain::catalog::{
        CatalogServiceError,
        models::{Listing, ListingRequest},
    },
    images::{ImageUrlResolver, image_url},
    repositories::PropertiesRepository,
};

#[derive(Clone)]
pub struct Catalog {
    properties: Arc<dyn PropertiesRepository>,
    images: Option<Arc<dyn ImageUrlResolver>>,
    page_size: u32,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("images", &self.images.is_some())
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl Catalog {
    #[must_use]
    pub fn new(
        properties: Arc<dyn PropertiesRepository>,
        images: Option<Arc<dyn ImageUrlResolver>>,
        page_size: u32,
    ) -> Self {
        Self {
            properties,
            images,
            page_size,
        }
    }

    fn listing(&self, property: Property) -> Listing {
        Listing {
            image_url: image_url(self.images.as_deref(), &property),
            property,
        }
    }
}

#[async_trait]
impl CatalogService for Catalog {
    #[tracing::instrument(
        name = "catalog.service.list_properties",
        skip(self),
        fields(total = tracing::field::Empty, pages = tracing::field::Empty),
        err
    )]
    async fn list_properties(
        &self,
        request: ListingRequest,
    ) -> Result<Page<Listing>, CatalogServiceError> {
        let query = CatalogQuery {
            search: request.search,
            sort: request.sort,
            page: request.page,
            page_size: self.page_size,
        };

        let page = self.properties.list_properties(&query).await?;

        let span = Span::current();

        span.record("total", page.total);
        span.record("pages", page.pages);

        Ok(page.map(|property| self.listing(property)))
    }

    #[tracing::instrument(name = "catalog.service.get_property", skip(self), err)]
    async fn get_property(&self, property: PropertyUuid) -> Result<Listing, CatalogServiceError> {
        let property = self.properties.get_property(property).await?;

        if !property.active {
            return Err(CatalogServiceError::NotFound);
        }

        Ok(self.listing(property))
    }

    #[tracing::instrument(
        name = "catalog.service.create_property",
        skip(self, property),
        fields(property_uuid = %property.uuid),
        err
    )]
    async fn create_property(&self, property: NewProperty) -> Result<Listing, CatalogServiceError> {
        property.validate()?;

        let created = self
            .properties
            .create_property(property.into_property())
            .await?;

        info!(property_uuid = %created.uuid, "created property");

        Ok(self.listing(created))
    }

    #[tracing::instrument(name = "catalog.service.set_property_active", skip(self), err)]
    async fn set_property_active(
        &self,
        property: PropertyUuid,
        active: bool,
    ) -> Result<Property, CatalogServiceError> {
        let updated = self
            .properties
            .set_property_active(property, active)
            .await?;

        info!(property_uuid = %updated.uuid, active, "changed property visibility");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// One page of active listings.
    async fn list_properties(
        &self,
        request: ListingRequest,
    ) -> Result<Page<Listing>, CatalogServiceError>;

    /// A single active listing.
    async fn get_property(&self, property: PropertyUuid) -> Result<Listing, CatalogServiceError>;

    /// Validate and store a new, active property.
    async fn create_property(&self, property: NewProperty) -> Result<Listing, CatalogServiceError>;

    /// Hide a property from the catalog or bring it back.
    async fn set_property_active(
        &self,
        property: PropertyUuid,
        active: bool,
    ) -> Result<Property, CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use url::Url;

    use realty::catalog::SortOrder;

    use crate::{
        images::{ImageError, MockImageUrlResolver},
        repositories::{MockPropertiesRepository, RepositoryError},
        test::{TestContext, fixtures},
    };

    use super::*;

    #[tokio::test]
    async fn listing_shows_three_per_page_cheapest_first() -> TestResult {
        let ctx = TestContext::new().await?;

        let page = ctx
            .catalog
            .list_properties(ListingRequest {
                sort: SortOrder::PriceAsc,
                page: 1,
                ..ListingRequest::default()
            })
            .await?;

        let names: Vec<&str> = page
            .items
            .iter()
            .map(|listing| listing.property.name.as_str())
            .collect();

        assert_eq!(page.total, 4);
        assert_eq!(page.pages, 2);
        assert_eq!(
            names,
            [
                fixtures::LAND_NAME,
                fixtures::APARTMENT_NAME,
                fixtures::COMMERCIAL_NAME
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn hidden_property_is_not_found() -> TestResult {
        let ctx = TestContext::new().await?;

        ctx.catalog
            .set_property_active(ctx.house.uuid, false)
            .await?;

        let result = ctx.catalog.get_property(ctx.house.uuid).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let page = ctx
            .catalog
            .list_properties(ListingRequest {
                search: Some("house".to_string()),
                ..ListingRequest::default()
            })
            .await?;

        assert!(page.items.is_empty(), "hidden house still listed");

        Ok(())
    }

    #[tokio::test]
    async fn create_property_validates_before_storing() {
        let mut repository = MockPropertiesRepository::new();

        repository.expect_create_property().never();

        let catalog = Catalog::new(Arc::new(repository), None, 3);

        let mut property = fixtures::new_apartment();
        property.price = rust_decimal::Decimal::new(-1, 0);

        let result = catalog.create_property(property).await;

        assert!(
            matches!(result, Err(CatalogServiceError::Invalid(_))),
            "expected Invalid, got {result:?}"
        );
    }

    #[tokio::test]
    async fn image_failure_degrades_to_no_image() -> TestResult {
        let property = fixtures::new_apartment().into_property();
        let uuid = property.uuid;

        let mut repository = MockPropertiesRepository::new();

        repository
            .expect_get_property()
            .returning(move |_| Ok(property.clone()));

        let mut images = MockImageUrlResolver::new();

        images
            .expect_resolve()
            .returning(|key| Err(ImageError::InvalidKey(key.to_string())));

        let catalog = Catalog::new(Arc::new(repository), Some(Arc::new(images)), 3);

        let listing = catalog.get_property(uuid).await?;

        assert!(listing.image_url.is_none(), "expected no image");

        Ok(())
    }

    #[tokio::test]
    async fn resolved_images_are_attached() -> TestResult {
        let property = fixtures::new_apartment().into_property();
        let uuid = property.uuid;

        let mut repository = MockPropertiesRepository::new();

        repository
            .expect_get_property()
            .returning(move |_| Ok(property.clone()));

        let mut images = MockImageUrlResolver::new();

        images
            .expect_resolve()
            .returning(|key| Ok(Url::parse(&format!("http://images.test/{key}"))?));

        let catalog = Catalog::new(Arc::new(repository), Some(Arc::new(images)), 3);

        let listing = catalog.get_property(uuid).await?;

        assert_eq!(
            listing.image_url.as_deref(),
            Some("http://images.test/flats/tverskaya.jpg")
        );

        Ok(())
    }

    #[tokio::test]
    async fn storage_failures_are_reported() {
        let mut repository = MockPropertiesRepository::new();

        repository
            .expect_list_properties()
            .returning(|_| Err(RepositoryError::Sql(sqlx::Error::PoolTimedOut)));

        let catalog = Catalog::new(Arc::new(repository), None, 3);

        let result = catalog.list_properties(ListingRequest::default()).await;

        assert!(
            matches!(result, Err(CatalogServiceError::Storage(_))),
            "expected Storage, got {result:?}"
        );
    }
}
