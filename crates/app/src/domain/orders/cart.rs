//! Cart service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use realty::{
    access::{Action, Actor},
    orders::{
        ClientDetails, LineUpdate, Order, OrderLine, OrderLineUuid, OrderUuid,
        cart::{self, LineRemoval},
    },
    properties::PropertyUuid,
};
use tracing::{Span, info};

use crate::{
    domain::orders::{OrdersServiceError, Resource, load_order, models::OrderDetails},
    repositories::{Expected, LineWrite, OrdersRepository, PropertiesRepository},
};

#[derive(Clone)]
pub struct CartManager {
    orders: Arc<dyn OrdersRepository>,
    properties: Arc<dyn PropertiesRepository>,
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager").finish_non_exhaustive()
    }
}

impl CartManager {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersRepository>,
        properties: Arc<dyn PropertiesRepository>,
    ) -> Self {
        Self { orders, properties }
    }
}

#[async_trait]
impl CartService for CartManager {
    #[tracing::instrument(
        name = "orders.cart.get_or_create_draft",
        skip(self),
        fields(order_uuid = tracing::field::Empty),
        err
    )]
    async fn get_or_create_draft(&self, actor: Actor) -> Result<Order, OrdersServiceError> {
        let creator = actor.user().ok_or(OrdersServiceError::Forbidden {
            action: Action::CreateDraft,
        })?;

        let draft = self
            .orders
            .get_or_create_draft(Order::draft(creator, Timestamp::now()))
            .await?;

        Span::current().record("order_uuid", tracing::field::display(draft.uuid));

        Ok(draft)
    }

    #[tracing::instrument(name = "orders.cart.get_draft", skip(self), err)]
    async fn get_draft(&self, actor: Actor) -> Result<Option<OrderDetails>, OrdersServiceError> {
        let Some(creator) = actor.user() else {
            return Ok(None);
        };

        let Some(draft) = self.orders.find_draft(creator).await? else {
            return Ok(None);
        };

        let snapshot = self.orders.get_order(draft.uuid).await?;

        Ok(Some(snapshot.into()))
    }

    #[tracing::instrument(
        name = "orders.cart.add_property",
        skip(self),
        fields(line_uuid = tracing::field::Empty, line_quantity = tracing::field::Empty),
        err
    )]
    async fn add_property(
        &self,
        actor: Actor,
        order: OrderUuid,
        property: PropertyUuid,
        quantity: u32,
    ) -> Result<OrderLine, OrdersServiceError> {
        let snapshot = load_order(self.orders.as_ref(), order).await?;

        cart::ensure_mutable(&actor, Action::AddProperty, &snapshot.order)?;

        let property = self
            .properties
            .get_property(property)
            .await
            .map_err(OrdersServiceError::missing(Resource::Property))?;

        let line = cart::add_property(
            &actor,
            &snapshot.order,
            &snapshot.lines,
            &property,
            quantity,
        )?
        .into_line();

        self.orders
            .write_lines(order, Expected::of(&snapshot), LineWrite::Upsert(line.clone()))
            .await?;

        let span = Span::current();

        span.record("line_uuid", tracing::field::display(line.uuid));
        span.record("line_quantity", line.quantity);

        info!(order_uuid = %order, property_uuid = %line.property, "added property to order");

        Ok(line)
    }

    #[tracing::instrument(name = "orders.cart.remove_line", skip(self), err)]
    async fn remove_line(
        &self,
        actor: Actor,
        order: OrderUuid,
        line: OrderLineUuid,
    ) -> Result<Vec<OrderLine>, OrdersServiceError> {
        let snapshot = load_order(self.orders.as_ref(), order).await?;

        let LineRemoval { removed, remaining } =
            cart::remove_line(&actor, &snapshot.order, &snapshot.lines, line)?;

        self.orders
            .write_lines(
                order,
                Expected::of(&snapshot),
                LineWrite::Remove {
                    line: removed.uuid,
                    renumbered: remaining.clone(),
                },
            )
            .await
            .map_err(OrdersServiceError::missing(Resource::Line))?;

        info!(order_uuid = %order, line_uuid = %removed.uuid, "removed line from order");

        Ok(remaining)
    }

    #[tracing::instrument(name = "orders.cart.update_line", skip(self), err)]
    async fn update_line(
        &self,
        actor: Actor,
        order: OrderUuid,
        line: OrderLineUuid,
        update: LineUpdate,
    ) -> Result<OrderLine, OrdersServiceError> {
        let snapshot = load_order(self.orders.as_ref(), order).await?;

        let updated = cart::update_line(&actor, &snapshot.order, &snapshot.lines, line, &update)?;

        self.orders
            .write_lines(order, Expected::of(&snapshot), LineWrite::Upsert(updated.clone()))
            .await?;

        info!(
            order_uuid = %order,
            line_uuid = %updated.uuid,
            final_price = %updated.final_price,
            "updated order line"
        );

        Ok(updated)
    }

    #[tracing::instrument(name = "orders.cart.update_client_details", skip(self, details), err)]
    async fn update_client_details(
        &self,
        actor: Actor,
        order: OrderUuid,
        details: ClientDetails,
    ) -> Result<Order, OrdersServiceError> {
        let snapshot = load_order(self.orders.as_ref(), order).await?;

        cart::ensure_mutable(&actor, Action::UpdateClientDetails, &snapshot.order)?;

        let mut updated = snapshot.order.clone();
        updated.client = details;

        self.orders
            .save_order(&updated, Expected::of(&snapshot), &[])
            .await?;

        info!(order_uuid = %order, "updated client details");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait CartService: Send + Sync {
    /// The actor's draft, created empty when they have none.
    async fn get_or_create_draft(&self, actor: Actor) -> Result<Order, OrdersServiceError>;

    /// The actor's draft with its lines, if they have one.
    async fn get_draft(&self, actor: Actor) -> Result<Option<OrderDetails>, OrdersServiceError>;

    /// Add `quantity` units of an active property to a draft.
    async fn add_property(
        &self,
        actor: Actor,
        order: OrderUuid,
        property: PropertyUuid,
        quantity: u32,
    ) -> Result<OrderLine, OrdersServiceError>;

    /// Drop a line from a draft. Returns the renumbered survivors.
    async fn remove_line(
        &self,
        actor: Actor,
        order: OrderUuid,
        line: OrderLineUuid,
    ) -> Result<Vec<OrderLine>, OrdersServiceError>;

    /// Change a line's quantity or discount.
    async fn update_line(
        &self,
        actor: Actor,
        order: OrderUuid,
        line: OrderLineUuid,
        update: LineUpdate,
    ) -> Result<OrderLine, OrdersServiceError>;

    /// Replace the buyer's contact details and payment choice.
    async fn update_client_details(
        &self,
        actor: Actor,
        order: OrderUuid,
        details: ClientDetails,
    ) -> Result<Order, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use realty::{access::UserUuid, orders::OrderStatus};
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::catalog::CatalogService,
        repositories::{
            MockOrdersRepository, MockPropertiesRepository, OrderSnapshot, RepositoryError,
        },
        test::{TestContext, fixtures},
    };

    use super::*;

    #[tokio::test]
    async fn get_or_create_draft_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await?;

        let first = ctx.cart.get_or_create_draft(ctx.customer).await?;
        let second = ctx.cart.get_or_create_draft(ctx.customer).await?;

        assert_eq!(first.uuid, second.uuid);
        assert_eq!(first.status, OrderStatus::Draft);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_draft_requests_share_one_draft() -> TestResult {
        let ctx = TestContext::new().await?;

        let (a, b) = tokio::join!(
            ctx.cart.get_or_create_draft(ctx.customer),
            ctx.cart.get_or_create_draft(ctx.customer)
        );

        assert_eq!(a?.uuid, b?.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn anonymous_visitors_have_no_draft() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx.cart.get_or_create_draft(Actor::Anonymous).await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden { .. })),
            "expected Forbidden, got {result:?}"
        );
        assert!(ctx.cart.get_draft(Actor::Anonymous).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn adding_properties_keeps_one_primary_line() -> TestResult {
        let ctx = TestContext::new().await?;
        let draft = ctx.cart.get_or_create_draft(ctx.customer).await?;

        for property in [ctx.apartment.uuid, ctx.house.uuid, ctx.apartment.uuid] {
            ctx.cart
                .add_property(ctx.customer, draft.uuid, property, 1)
                .await?;
        }

        let details = ctx
            .cart
            .get_draft(ctx.customer)
            .await?
            .ok_or("draft missing")?;

        let lines: Vec<(u32, bool, u32)> = details
            .lines
            .iter()
            .map(|line| (line.position, line.is_primary, line.quantity))
            .collect();

        assert_eq!(lines, [(1, true, 2), (2, false, 1)]);
        assert_eq!(
            details.lines.first().map(|line| line.final_price),
            Some(Decimal::new(17_000_000, 0))
        );

        Ok(())
    }

    #[tokio::test]
    async fn inactive_property_cannot_be_added() -> TestResult {
        let ctx = TestContext::new().await?;
        let draft = ctx.cart.get_or_create_draft(ctx.customer).await?;

        ctx.catalog
            .set_property_active(ctx.land.uuid, false)
            .await?;

        let result = ctx
            .cart
            .add_property(ctx.customer, draft.uuid, ctx.land.uuid, 1)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound(Resource::Property))),
            "expected NotFound(Property), got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn removing_a_line_renumbers_the_rest() -> TestResult {
        let ctx = TestContext::new().await?;
        let draft = ctx.cart.get_or_create_draft(ctx.customer).await?;

        let first = ctx
            .cart
            .add_property(ctx.customer, draft.uuid, ctx.apartment.uuid, 1)
            .await?;

        for property in [ctx.house.uuid, ctx.land.uuid] {
            ctx.cart
                .add_property(ctx.customer, draft.uuid, property, 1)
                .await?;
        }

        let remaining = ctx
            .cart
            .remove_line(ctx.customer, draft.uuid, first.uuid)
            .await?;

        let stored = ctx
            .cart
            .get_draft(ctx.customer)
            .await?
            .ok_or("draft missing")?;

        assert_eq!(stored.lines, remaining);

        let shape: Vec<(u32, bool)> = stored
            .lines
            .iter()
            .map(|line| (line.position, line.is_primary))
            .collect();

        assert_eq!(shape, [(1, true), (2, false)]);
        assert_eq!(
            stored.lines.first().map(|line| line.property),
            Some(ctx.house.uuid)
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_then_add_starts_over_at_one() -> TestResult {
        let ctx = TestContext::new().await?;
        let draft = ctx.cart.get_or_create_draft(ctx.customer).await?;

        let line = ctx
            .cart
            .add_property(ctx.customer, draft.uuid, ctx.house.uuid, 4)
            .await?;

        ctx.cart
            .remove_line(ctx.customer, draft.uuid, line.uuid)
            .await?;

        let again = ctx
            .cart
            .add_property(ctx.customer, draft.uuid, ctx.house.uuid, 1)
            .await?;

        assert_eq!(again.quantity, 1);
        assert_eq!(again.position, 1);
        assert!(again.is_primary, "re-added line should be primary");

        Ok(())
    }

    #[tokio::test]
    async fn other_customers_cannot_touch_a_draft() -> TestResult {
        let ctx = TestContext::new().await?;
        let draft = ctx.cart.get_or_create_draft(ctx.customer).await?;
        let stranger = Actor::Customer(UserUuid::new());

        let result = ctx
            .cart
            .add_property(stranger, draft.uuid, ctx.house.uuid, 1)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden { .. })),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn moderators_set_discounts() -> TestResult {
        let ctx = TestContext::new().await?;
        let draft = ctx.cart.get_or_create_draft(ctx.customer).await?;

        let line = ctx
            .cart
            .add_property(ctx.customer, draft.uuid, ctx.commercial.uuid, 1)
            .await?;

        let update = LineUpdate {
            quantity: None,
            discount_percent: Some(Decimal::new(10, 0)),
        };

        let refused = ctx
            .cart
            .update_line(ctx.customer, draft.uuid, line.uuid, update.clone())
            .await;

        assert!(
            matches!(refused, Err(OrdersServiceError::Forbidden { .. })),
            "expected Forbidden, got {refused:?}"
        );

        let updated = ctx
            .cart
            .update_line(ctx.moderator, draft.uuid, line.uuid, update)
            .await?;

        assert_eq!(updated.final_price, Decimal::new(10_800_000, 0));

        let invalid = ctx
            .cart
            .update_line(
                ctx.moderator,
                draft.uuid,
                line.uuid,
                LineUpdate {
                    quantity: Some(0),
                    discount_percent: None,
                },
            )
            .await;

        assert!(
            matches!(invalid, Err(OrdersServiceError::InvalidData(_))),
            "expected InvalidData, got {invalid:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn client_details_are_stored_verbatim() -> TestResult {
        let ctx = TestContext::new().await?;
        let draft = ctx.cart.get_or_create_draft(ctx.customer).await?;

        let updated = ctx
            .cart
            .update_client_details(ctx.customer, draft.uuid, fixtures::client_details())
            .await?;

        let stored = ctx
            .cart
            .get_draft(ctx.customer)
            .await?
            .ok_or("draft missing")?;

        assert_eq!(updated.client, fixtures::client_details());
        assert_eq!(stored.order.client, fixtures::client_details());

        Ok(())
    }

    #[tokio::test]
    async fn stale_writes_surface_as_conflict() -> TestResult {
        let creator = UserUuid::new();
        let order = Order::draft(creator, Timestamp::now());
        let uuid = order.uuid;

        let mut orders = MockOrdersRepository::new();

        orders.expect_get_order().returning(move |_| {
            Ok(OrderSnapshot {
                order: order.clone(),
                lines: Vec::new(),
                revision: 3,
            })
        });

        orders
            .expect_save_order()
            .returning(|_, _, _| Err(RepositoryError::Conflict));

        let manager = CartManager::new(Arc::new(orders), unused_properties());

        let result = manager
            .update_client_details(Actor::Customer(creator), uuid, fixtures::client_details())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Conflict)),
            "expected Conflict, got {result:?}"
        );

        Ok(())
    }

    fn unused_properties() -> Arc<dyn PropertiesRepository> {
        Arc::new(MockPropertiesRepository::new())
    }
}
