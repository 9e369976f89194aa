//! Cart Rules
//!
//! Line mutations on a draft order. Each function checks the actor and the
//! order's status, then returns the rows a store must write; nothing here
//! touches storage.

use crate::{
    access::{Action, Actor},
    orders::{
        LineUpdate, Order, OrderError, OrderLine, OrderLineUuid, OrderStatus, lines::renumber,
    },
    properties::Property,
};

/// Result of adding a property to a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum LineChange {
    /// A new line was created at the end of the order.
    Added(OrderLine),
    /// The property was already present; its quantity grew.
    Incremented(OrderLine),
}

impl LineChange {
    /// The line after the change.
    pub fn line(&self) -> &OrderLine {
        match self {
            Self::Added(line) | Self::Incremented(line) => line,
        }
    }

    pub fn into_line(self) -> OrderLine {
        match self {
            Self::Added(line) | Self::Incremented(line) => line,
        }
    }
}

/// Lines left after a removal, already renumbered.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRemoval {
    pub removed: OrderLine,
    pub remaining: Vec<OrderLine>,
}

/// Refuse `action` unless `actor` may perform it on a draft `order`.
///
/// # Errors
///
/// - [`OrderError::Forbidden`]: the policy refuses the actor.
/// - [`OrderError::InvalidState`]: the order has left `draft`.
pub fn ensure_mutable(actor: &Actor, action: Action, order: &Order) -> Result<(), OrderError> {
    if !actor.may(action, order) {
        return Err(OrderError::Forbidden { action });
    }

    if !order.status.is_mutable() {
        return Err(OrderError::InvalidState {
            action,
            status: order.status,
            required: OrderStatus::Draft,
        });
    }

    Ok(())
}

/// Add `quantity` units of `property` to `order`.
///
/// An existing line for the property grows by `quantity`; otherwise a new
/// line is appended at position `lines.len() + 1`. The order total is not
/// touched.
///
/// # Errors
///
/// - [`OrderError::Forbidden`] / [`OrderError::InvalidState`]: see [`ensure_mutable`].
/// - [`OrderError::PropertyUnavailable`]: the property is inactive.
/// - [`OrderError::InvalidQuantity`]: `quantity` is zero.
/// - [`OrderError::Pricing`]: the line price overflowed.
pub fn add_property(
    actor: &Actor,
    order: &Order,
    lines: &[OrderLine],
    property: &Property,
    quantity: u32,
) -> Result<LineChange, OrderError> {
    ensure_mutable(actor, Action::AddProperty, order)?;

    if !property.active {
        return Err(OrderError::PropertyUnavailable(property.uuid));
    }

    if quantity == 0 {
        return Err(OrderError::InvalidQuantity);
    }

    if let Some(existing) = lines.iter().find(|line| line.property == property.uuid) {
        let mut line = existing.clone();

        line.quantity = line.quantity.saturating_add(quantity);
        line.recompute_price()?;

        return Ok(LineChange::Incremented(line));
    }

    let position = u32::try_from(lines.len())
        .unwrap_or(u32::MAX)
        .saturating_add(1);

    OrderLine::new(order.uuid, property, quantity, position).map(LineChange::Added)
}

/// Remove `line` from `order` and renumber what is left.
///
/// # Errors
///
/// - [`OrderError::Forbidden`] / [`OrderError::InvalidState`]: see [`ensure_mutable`].
/// - [`OrderError::LineNotFound`]: the line is not on this order.
pub fn remove_line(
    actor: &Actor,
    order: &Order,
    lines: &[OrderLine],
    line: OrderLineUuid,
) -> Result<LineRemoval, OrderError> {
    ensure_mutable(actor, Action::RemoveLine, order)?;

    let removed = lines
        .iter()
        .find(|candidate| candidate.uuid == line && candidate.order == order.uuid)
        .cloned()
        .ok_or(OrderError::LineNotFound(line))?;

    let mut remaining: Vec<OrderLine> = lines
        .iter()
        .filter(|candidate| candidate.uuid != line)
        .cloned()
        .collect();

    renumber(&mut remaining);

    Ok(LineRemoval { removed, remaining })
}

/// Change quantity or discount on one line.
///
/// # Errors
///
/// - [`OrderError::Forbidden`] / [`OrderError::InvalidState`]: see [`ensure_mutable`].
/// - [`OrderError::LineNotFound`]: the line is not on this order.
/// - [`OrderError::InvalidQuantity`] / [`OrderError::InvalidDiscount`]: bad values.
pub fn update_line(
    actor: &Actor,
    order: &Order,
    lines: &[OrderLine],
    line: OrderLineUuid,
    update: &LineUpdate,
) -> Result<OrderLine, OrderError> {
    ensure_mutable(actor, Action::UpdateLine, order)?;

    let mut target = lines
        .iter()
        .find(|candidate| candidate.uuid == line && candidate.order == order.uuid)
        .cloned()
        .ok_or(OrderError::LineNotFound(line))?;

    update.apply(&mut target)?;

    Ok(target)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        access::UserUuid,
        properties::{PropertyKind, PropertyUuid},
    };

    use super::*;

    fn property(price: i64) -> Property {
        Property {
            uuid: PropertyUuid::new(),
            name: "Office".to_string(),
            description: String::new(),
            price: Decimal::new(price, 0),
            area: Decimal::new(120, 0),
            address: "Presnenskaya Emb. 10".to_string(),
            rooms: 3,
            floor: Some(5),
            total_floors: Some(25),
            kind: PropertyKind::Commercial,
            active: true,
            image_key: None,
        }
    }

    fn draft() -> (Actor, Order) {
        let owner = UserUuid::new();

        (
            Actor::Customer(owner),
            Order::draft(owner, jiff::Timestamp::UNIX_EPOCH),
        )
    }

    fn add(
        actor: &Actor,
        order: &Order,
        lines: &mut Vec<OrderLine>,
        property: &Property,
    ) -> TestResult {
        match add_property(actor, order, lines, property, 1)? {
            LineChange::Added(line) => lines.push(line),
            LineChange::Incremented(line) => {
                for existing in lines.iter_mut() {
                    if existing.uuid == line.uuid {
                        *existing = line.clone();
                    }
                }
            }
        }

        Ok(())
    }

    #[test]
    fn adding_new_property_appends_line() -> TestResult {
        let (actor, order) = draft();
        let mut lines = Vec::new();

        add(&actor, &order, &mut lines, &property(100))?;
        add(&actor, &order, &mut lines, &property(200))?;

        let positions: Vec<(u32, bool)> = lines.iter().map(|l| (l.position, l.is_primary)).collect();

        assert_eq!(positions, [(1, true), (2, false)]);

        Ok(())
    }

    #[test]
    fn adding_same_property_increments_quantity() -> TestResult {
        let (actor, order) = draft();
        let house = property(1_000);
        let mut lines = Vec::new();

        add(&actor, &order, &mut lines, &house)?;

        let change = add_property(&actor, &order, &lines, &house, 2)?;

        assert!(matches!(change, LineChange::Incremented(_)));
        assert_eq!(change.line().quantity, 3);
        assert_eq!(change.line().final_price, Decimal::new(3_000, 0));
        assert_eq!(change.line().uuid, lines.first().map(|l| l.uuid).unwrap_or_default());

        Ok(())
    }

    #[test]
    fn inactive_property_is_unavailable() {
        let (actor, order) = draft();
        let mut hidden = property(1);
        hidden.active = false;

        let result = add_property(&actor, &order, &[], &hidden, 1);

        assert!(matches!(result, Err(OrderError::PropertyUnavailable(_))));
    }

    #[test]
    fn formed_order_rejects_additions() {
        let (actor, mut order) = draft();
        order.status = OrderStatus::Formed;

        let result = add_property(&actor, &order, &[], &property(1), 1);

        assert!(matches!(
            result,
            Err(OrderError::InvalidState {
                status: OrderStatus::Formed,
                ..
            })
        ));
    }

    #[test]
    fn strangers_cannot_add() {
        let (_, order) = draft();

        let result = add_property(
            &Actor::Customer(UserUuid::new()),
            &order,
            &[],
            &property(1),
            1,
        );

        assert!(matches!(result, Err(OrderError::Forbidden { .. })));
    }

    #[test]
    fn removing_primary_promotes_next_line() -> TestResult {
        let (actor, order) = draft();
        let mut lines = Vec::new();

        for price in [1, 2, 3] {
            add(&actor, &order, &mut lines, &property(price))?;
        }

        let first = lines.first().map(|l| l.uuid).unwrap_or_default();

        let removal = remove_line(&actor, &order, &lines, first)?;

        assert_eq!(removal.removed.uuid, first);
        assert_eq!(removal.remaining.len(), 2);

        let primary: Vec<bool> = removal.remaining.iter().map(|l| l.is_primary).collect();
        let positions: Vec<u32> = removal.remaining.iter().map(|l| l.position).collect();

        assert_eq!(primary, [true, false]);
        assert_eq!(positions, [1, 2]);

        Ok(())
    }

    #[test]
    fn removing_unknown_line_is_not_found() {
        let (actor, order) = draft();

        let result = remove_line(&actor, &order, &[], OrderLineUuid::new());

        assert!(matches!(result, Err(OrderError::LineNotFound(_))));
    }

    #[test]
    fn remove_then_add_starts_from_quantity_one() -> TestResult {
        let (actor, order) = draft();
        let house = property(500);
        let mut lines = Vec::new();

        add(&actor, &order, &mut lines, &house)?;
        add(&actor, &order, &mut lines, &house)?;
        add(&actor, &order, &mut lines, &house)?;

        let line = lines.first().map(|l| l.uuid).unwrap_or_default();
        let removal = remove_line(&actor, &order, &lines, line)?;

        let change = add_property(&actor, &order, &removal.remaining, &house, 1)?;

        assert!(matches!(change, LineChange::Added(_)));
        assert_eq!(change.line().quantity, 1);
        assert_eq!(change.line().position, 1);
        assert!(change.line().is_primary);

        Ok(())
    }

    #[test]
    fn only_moderators_edit_discounts() -> TestResult {
        let (actor, order) = draft();
        let mut lines = Vec::new();

        add(&actor, &order, &mut lines, &property(1_000))?;

        let line = lines.first().map(|l| l.uuid).unwrap_or_default();
        let update = LineUpdate {
            quantity: None,
            discount_percent: Some(Decimal::new(10, 0)),
        };

        assert!(matches!(
            update_line(&actor, &order, &lines, line, &update),
            Err(OrderError::Forbidden { .. })
        ));

        let moderator = Actor::Moderator(UserUuid::new());
        let updated = update_line(&moderator, &order, &lines, line, &update)?;

        assert_eq!(updated.final_price, Decimal::new(900, 0));

        Ok(())
    }
}
