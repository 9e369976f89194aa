//! Lifecycle service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use realty::{
    access::{Action, Actor},
    orders::{Order, OrderStatus, OrderUuid},
    properties::PropertyUuid,
};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use tracing::{Span, info};

use crate::{
    domain::orders::{OrdersServiceError, load_order, models::OrderDetails},
    repositories::{Expected, OrderFilter, OrdersRepository, PropertiesRepository},
};

#[derive(Clone)]
pub struct LifecycleEngine {
    orders: Arc<dyn OrdersRepository>,
    properties: Arc<dyn PropertiesRepository>,
}

impl std::fmt::Debug for LifecycleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEngine").finish_non_exhaustive()
    }
}

impl LifecycleEngine {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersRepository>,
        properties: Arc<dyn PropertiesRepository>,
    ) -> Self {
        Self { orders, properties }
    }

    /// Current catalog price of every property in `properties`, active or not.
    async fn current_prices(
        &self,
        properties: Vec<PropertyUuid>,
    ) -> Result<FxHashMap<PropertyUuid, Decimal>, OrdersServiceError> {
        let properties = self.properties.get_properties(&properties).await?;

        Ok(properties
            .into_iter()
            .map(|property| (property.uuid, property.price))
            .collect())
    }
}

#[async_trait]
impl LifecycleService for LifecycleEngine {
    #[tracing::instrument(name = "orders.lifecycle.submit", skip(self), err)]
    async fn submit(&self, actor: Actor, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let snapshot = load_order(self.orders.as_ref(), order).await?;

        let mut submitted = snapshot.order.clone();

        submitted.submit(&actor, snapshot.lines.len(), Timestamp::now())?;

        self.orders
            .save_order(&submitted, Expected::of(&snapshot), &[])
            .await?;

        info!(order_uuid = %order, lines = snapshot.lines.len(), "order formed");

        Ok(submitted)
    }

    #[tracing::instrument(
        name = "orders.lifecycle.approve",
        skip(self),
        fields(
            total_price = tracing::field::Empty,
            estimated_delivery_date = tracing::field::Empty
        ),
        err
    )]
    async fn approve(
        &self,
        actor: Actor,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let snapshot = load_order(self.orders.as_ref(), order).await?;

        snapshot
            .order
            .ensure_transition(&actor, Action::Approve, OrderStatus::Completed)?;

        let prices = self
            .current_prices(snapshot.lines.iter().map(|line| line.property).collect())
            .await?;

        let mut approved = snapshot.order.clone();

        let lines = approved.approve(
            &actor,
            &snapshot.lines,
            |property| prices.get(&property).copied(),
            Timestamp::now(),
        )?;

        self.orders
            .save_order(&approved, Expected::of(&snapshot), &lines)
            .await?;

        let span = Span::current();

        span.record("total_price", tracing::field::display(approved.total_price));

        if let Some(date) = approved.estimated_delivery_date {
            span.record("estimated_delivery_date", tracing::field::display(date));
        }

        info!(order_uuid = %order, total_price = %approved.total_price, "order completed");

        Ok(OrderDetails {
            order: approved,
            lines,
        })
    }

    #[tracing::instrument(name = "orders.lifecycle.reject", skip(self), err)]
    async fn reject(&self, actor: Actor, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let snapshot = load_order(self.orders.as_ref(), order).await?;

        let mut rejected = snapshot.order.clone();

        rejected.reject(&actor, Timestamp::now())?;

        self.orders
            .save_order(&rejected, Expected::of(&snapshot), &[])
            .await?;

        info!(order_uuid = %order, "order rejected");

        Ok(rejected)
    }

    #[tracing::instrument(name = "orders.lifecycle.soft_delete", skip(self), err)]
    async fn soft_delete(&self, actor: Actor, order: OrderUuid) -> Result<(), OrdersServiceError> {
        let snapshot = load_order(self.orders.as_ref(), order).await?;

        snapshot.order.clone().soft_delete(&actor)?;

        self.orders.mark_deleted(order).await?;

        info!(order_uuid = %order, "order deleted");

        Ok(())
    }

    #[tracing::instrument(name = "orders.lifecycle.get_order", skip(self), err)]
    async fn get_order(
        &self,
        actor: Actor,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let snapshot = load_order(self.orders.as_ref(), order).await?;

        if !actor.may(Action::View, &snapshot.order) {
            return Err(OrdersServiceError::Forbidden {
                action: Action::View,
            });
        }

        Ok(snapshot.into())
    }

    #[tracing::instrument(
        name = "orders.lifecycle.list_orders",
        skip(self),
        fields(count = tracing::field::Empty),
        err
    )]
    async fn list_orders(
        &self,
        actor: Actor,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let creator = match actor {
            Actor::Anonymous => {
                return Err(OrdersServiceError::Forbidden {
                    action: Action::View,
                });
            }
            Actor::Customer(user) => Some(user),
            Actor::Moderator(_) => None,
        };

        let orders = self
            .orders
            .list_orders(OrderFilter { creator, status })
            .await?;

        Span::current().record("count", orders.len());

        Ok(orders)
    }
}

#[automock]
#[async_trait]
pub trait LifecycleService: Send + Sync {
    /// Creator places a complete draft for moderation.
    async fn submit(&self, actor: Actor, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Moderator completes a formed order, pricing it and dating delivery.
    async fn approve(
        &self,
        actor: Actor,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError>;

    /// Moderator turns a formed order down.
    async fn reject(&self, actor: Actor, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Creator or moderator discards a draft.
    async fn soft_delete(&self, actor: Actor, order: OrderUuid) -> Result<(), OrdersServiceError>;

    /// An order with its lines, for its creator or a moderator.
    async fn get_order(
        &self,
        actor: Actor,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError>;

    /// Orders visible to `actor`, newest first.
    async fn list_orders(
        &self,
        actor: Actor,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrdersServiceError>;
}
