//! App Context

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    config::{AppConfig, ImageConfig},
    database::{self, Db},
    domain::{
        catalog::{Catalog, CatalogService},
        orders::{CartManager, CartService, LifecycleEngine, LifecycleService},
    },
    images::{BucketUrlResolver, ImageError, ImageUrlResolver},
    repositories::{
        OrdersRepository, PgOrdersRepository, PgPropertiesRepository, PropertiesRepository,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("invalid image storage settings")]
    Images(#[source] ImageError),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub cart: Arc<dyn CartService>,
    pub lifecycle: Arc<dyn LifecycleService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context backed by `PostgreSQL`.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails or the
    /// image settings are invalid.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let images = resolver(&config.images)?;

        let pool = database::connect(&config.database_url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self::from_repositories(
            Arc::new(PgPropertiesRepository::new(db.clone())),
            Arc::new(PgOrdersRepository::new(db)),
            images,
            config.catalog_page_size,
        ))
    }

    /// Wire the services over the given storage.
    #[must_use]
    pub fn from_repositories(
        properties: Arc<dyn PropertiesRepository>,
        orders: Arc<dyn OrdersRepository>,
        images: Option<Arc<dyn ImageUrlResolver>>,
        page_size: u32,
    ) -> Self {
        Self {
            catalog: Arc::new(Catalog::new(Arc::clone(&properties), images, page_size)),
            cart: Arc::new(CartManager::new(Arc::clone(&orders), Arc::clone(&properties))),
            lifecycle: Arc::new(LifecycleEngine::new(orders, properties)),
        }
    }
}

fn resolver(config: &ImageConfig) -> Result<Option<Arc<dyn ImageUrlResolver>>, AppInitError> {
    let Some(endpoint) = config.image_endpoint.as_deref() else {
        info!("no image endpoint configured; listings will carry no image URL");

        return Ok(None);
    };

    let resolver =
        BucketUrlResolver::new(endpoint, &config.image_bucket).map_err(AppInitError::Images)?;

    Ok(Some(Arc::new(resolver)))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use realty::access::{Actor, UserUuid};

    use crate::{
        domain::catalog::models::ListingRequest, repositories::MemoryStore, test::fixtures,
    };

    use super::*;

    #[tokio::test]
    async fn services_share_one_store() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let ctx = AppContext::from_repositories(store.clone(), store, None, 3);

        let listing = ctx.catalog.create_property(fixtures::new_apartment()).await?;

        let customer = Actor::Customer(UserUuid::new());
        let draft = ctx.cart.get_or_create_draft(customer).await?;

        ctx.cart
            .add_property(customer, draft.uuid, listing.property.uuid, 1)
            .await?;

        let details = ctx.lifecycle.get_order(customer, draft.uuid).await?;
        let page = ctx.catalog.list_properties(ListingRequest::default()).await?;

        assert_eq!(details.lines.len(), 1);
        assert_eq!(page.total, 1);

        Ok(())
    }

    #[test]
    fn bad_image_endpoint_is_rejected() {
        let result = resolver(&ImageConfig {
            image_endpoint: Some("not a url".to_string()),
            image_bucket: "properties".to_string(),
        });

        assert!(
            matches!(result, Err(AppInitError::Images(_))),
            "expected Images error"
        );
    }
}
