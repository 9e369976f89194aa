//! In-memory store.
//!
//! Implements both repositories over maps guarded by a single mutex, so each
//! repository call is atomic. Used by tests and local runs without a database.

use std::cmp::Reverse;

use async_trait::async_trait;
use realty::{
    access::UserUuid,
    catalog::{CatalogQuery, Page},
    orders::{Order, OrderLine, OrderStatus, OrderUuid},
    properties::{Property, PropertyUuid},
};
use rustc_hash::FxHashMap;
use tokio::sync::Mutex;

use super::{
    Expected, LineWrite, OrderFilter, OrderSnapshot, OrdersRepository, PropertiesRepository,
    RepositoryError,
};

#[derive(Debug)]
struct StoredOrder {
    order: Order,
    lines: Vec<OrderLine>,
    revision: i64,
}

impl StoredOrder {
    fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            order: self.order.clone(),
            lines: self.lines.clone(),
            revision: self.revision,
        }
    }

    fn check(&self, expected: Expected) -> Result<(), RepositoryError> {
        if self.order.status == expected.status && self.revision == expected.revision {
            Ok(())
        } else {
            Err(RepositoryError::Conflict)
        }
    }
}

#[derive(Debug, Default)]
struct State {
    properties: FxHashMap<PropertyUuid, Property>,
    orders: FxHashMap<OrderUuid, StoredOrder>,
}

impl State {
    fn order_mut(&mut self, order: OrderUuid) -> Result<&mut StoredOrder, RepositoryError> {
        self.orders.get_mut(&order).ok_or(RepositoryError::NotFound)
    }

    fn draft_of(&self, creator: UserUuid) -> Option<&Order> {
        self.orders
            .values()
            .map(|stored| &stored.order)
            .find(|order| order.creator == creator && order.status == OrderStatus::Draft)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PropertiesRepository for MemoryStore {
    async fn list_properties(
        &self,
        query: &CatalogQuery,
    ) -> Result<Page<Property>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(query.apply(state.properties.values().cloned()))
    }

    async fn get_property(&self, property: PropertyUuid) -> Result<Property, RepositoryError> {
        let state = self.state.lock().await;

        state
            .properties
            .get(&property)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_properties(
        &self,
        properties: &[PropertyUuid],
    ) -> Result<Vec<Property>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(properties
            .iter()
            .filter_map(|uuid| state.properties.get(uuid).cloned())
            .collect())
    }

    async fn create_property(&self, property: Property) -> Result<Property, RepositoryError> {
        let mut state = self.state.lock().await;

        if state.properties.contains_key(&property.uuid) {
            return Err(RepositoryError::Conflict);
        }

        state.properties.insert(property.uuid, property.clone());

        Ok(property)
    }

    async fn set_property_active(
        &self,
        property: PropertyUuid,
        active: bool,
    ) -> Result<Property, RepositoryError> {
        let mut state = self.state.lock().await;

        let stored = state
            .properties
            .get_mut(&property)
            .ok_or(RepositoryError::NotFound)?;

        stored.active = active;

        Ok(stored.clone())
    }
}

#[async_trait]
impl OrdersRepository for MemoryStore {
    async fn get_or_create_draft(&self, candidate: Order) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock().await;

        if let Some(existing) = state.draft_of(candidate.creator) {
            return Ok(existing.clone());
        }

        if state.orders.contains_key(&candidate.uuid) {
            return Err(RepositoryError::Conflict);
        }

        state.orders.insert(
            candidate.uuid,
            StoredOrder {
                order: candidate.clone(),
                lines: Vec::new(),
                revision: 0,
            },
        );

        Ok(candidate)
    }

    async fn find_draft(&self, creator: UserUuid) -> Result<Option<Order>, RepositoryError> {
        let state = self.state.lock().await;

        Ok(state.draft_of(creator).cloned())
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderSnapshot, RepositoryError> {
        let state = self.state.lock().await;

        state
            .orders
            .get(&order)
            .map(StoredOrder::snapshot)
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let state = self.state.lock().await;

        let mut orders: Vec<Order> = state
            .orders
            .values()
            .map(|stored| &stored.order)
            .filter(|order| filter.matches(order))
            .cloned()
            .collect();

        orders.sort_by_key(|order| Reverse((order.created_at, order.uuid)));

        Ok(orders)
    }

    async fn write_lines(
        &self,
        order: OrderUuid,
        expected: Expected,
        write: LineWrite,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;

        if let LineWrite::Upsert(line) = &write
            && !state.properties.contains_key(&line.property)
        {
            return Err(RepositoryError::InvalidReference);
        }

        let stored = state.order_mut(order)?;

        stored.check(expected)?;

        let mut lines = stored.lines.clone();

        match write {
            LineWrite::Upsert(line) => {
                if line.order != order {
                    return Err(RepositoryError::InvalidReference);
                }

                let clash = lines.iter().any(|existing| {
                    existing.uuid != line.uuid && existing.property == line.property
                });

                if clash {
                    return Err(RepositoryError::Conflict);
                }

                match lines.iter_mut().find(|existing| existing.uuid == line.uuid) {
                    Some(existing) => *existing = line,
                    None => lines.push(line),
                }
            }
            LineWrite::Remove { line, renumbered } => {
                lines.retain(|existing| existing.uuid != line);

                for moved in renumbered {
                    if let Some(existing) = lines.iter_mut().find(|l| l.uuid == moved.uuid) {
                        existing.position = moved.position;
                        existing.is_primary = moved.is_primary;
                    }
                }
            }
        }

        lines.sort_by_key(|line| line.position);

        stored.lines = lines;
        stored.revision += 1;

        Ok(())
    }

    async fn save_order(
        &self,
        order: &Order,
        expected: Expected,
        lines: &[OrderLine],
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;

        let stored = state.order_mut(order.uuid)?;

        stored.check(expected)?;

        let mut repriced = stored.lines.clone();

        for line in lines {
            let existing = repriced
                .iter_mut()
                .find(|existing| existing.uuid == line.uuid)
                .ok_or(RepositoryError::InvalidReference)?;

            existing.unit_price = line.unit_price;
            existing.final_price = line.final_price;
        }

        stored.order = order.clone();
        stored.lines = repriced;
        stored.revision += 1;

        Ok(())
    }

    async fn mark_deleted(&self, order: OrderUuid) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;

        let stored = state.order_mut(order)?;

        if stored.order.status != OrderStatus::Draft {
            return Err(RepositoryError::Conflict);
        }

        stored.order.status = OrderStatus::Deleted;
        stored.revision += 1;

        Ok(())
    }
}
