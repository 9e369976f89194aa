//! Repositories
//!
//! Storage seams for the catalog and for orders. Services hold them as trait
//! objects so the same rules run over `PostgreSQL` and the in-memory store.

use async_trait::async_trait;
use mockall::automock;
use realty::{
    access::UserUuid,
    catalog::{CatalogQuery, Page},
    orders::{Order, OrderLine, OrderLineUuid, OrderStatus, OrderUuid},
    properties::{Property, PropertyUuid},
};

mod errors;
pub mod memory;
pub mod postgres;

pub use errors::RepositoryError;
pub use memory::MemoryStore;
pub use postgres::{PgOrdersRepository, PgPropertiesRepository};

/// An order as read from storage, with its lines in position order and the
/// revision the read observed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSnapshot {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    pub revision: i64,
}

/// Preconditions a write re-checks atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expected {
    pub status: OrderStatus,
    pub revision: i64,
}

impl Expected {
    /// Expect the snapshot's current status and revision.
    pub fn of(snapshot: &OrderSnapshot) -> Self {
        Self {
            status: snapshot.order.status,
            revision: snapshot.revision,
        }
    }
}

/// Line change on a draft, applied as one atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum LineWrite {
    /// Insert a line or overwrite the stored line with the same UUID.
    Upsert(OrderLine),
    /// Delete a line and move the survivors to their new positions.
    Remove {
        line: OrderLineUuid,
        renumbered: Vec<OrderLine>,
    },
}

/// Order listing filter. Deleted orders are never listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub creator: Option<UserUuid>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        order.status != OrderStatus::Deleted
            && self.creator.is_none_or(|creator| order.creator == creator)
            && self.status.is_none_or(|status| order.status == status)
    }
}

#[automock]
#[async_trait]
pub trait PropertiesRepository: Send + Sync {
    /// One page of active properties matching `query`.
    async fn list_properties(&self, query: &CatalogQuery)
    -> Result<Page<Property>, RepositoryError>;

    /// A property regardless of its active flag.
    async fn get_property(&self, property: PropertyUuid) -> Result<Property, RepositoryError>;

    /// Every known property among `properties`, active or not.
    async fn get_properties(
        &self,
        properties: &[PropertyUuid],
    ) -> Result<Vec<Property>, RepositoryError>;

    async fn create_property(&self, property: Property) -> Result<Property, RepositoryError>;

    async fn set_property_active(
        &self,
        property: PropertyUuid,
        active: bool,
    ) -> Result<Property, RepositoryError>;
}

#[automock]
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Store `candidate` unless its creator already has a draft, then return
    /// whichever draft won.
    async fn get_or_create_draft(&self, candidate: Order) -> Result<Order, RepositoryError>;

    async fn find_draft(&self, creator: UserUuid) -> Result<Option<Order>, RepositoryError>;

    async fn get_order(&self, order: OrderUuid) -> Result<OrderSnapshot, RepositoryError>;

    /// Newest first.
    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, RepositoryError>;

    /// Apply `write` to a draft still at `expected`, bumping its revision.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the order moved on.
    async fn write_lines(
        &self,
        order: OrderUuid,
        expected: Expected,
        write: LineWrite,
    ) -> Result<(), RepositoryError>;

    /// Overwrite the order's mutable fields and the prices of `lines`,
    /// provided the stored order is still at `expected`.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the order moved on.
    async fn save_order(
        &self,
        order: &Order,
        expected: Expected,
        lines: &[OrderLine],
    ) -> Result<(), RepositoryError>;

    /// Flip a draft to `deleted`. Nothing else about the order changes.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the order is no longer a draft.
    async fn mark_deleted(&self, order: OrderUuid) -> Result<(), RepositoryError>;
}
