//! Order Lifecycle
//!
//! Status transitions with their guards. A refused transition leaves the
//! order untouched.

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    access::{Action, Actor},
    orders::{MissingFields, Order, OrderError, OrderLine, OrderStatus},
    pricing,
    properties::PropertyUuid,
};

impl Order {
    /// Check the actor, then that the order may move to `target`. The
    /// transitions below run this first; callers that must gather data
    /// before transitioning can run it up front.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Forbidden`]: the policy refuses `actor`.
    /// - [`OrderError::InvalidState`]: no edge leads from the current status
    ///   to `target`; `required` names the status that has one.
    pub fn ensure_transition(
        &self,
        actor: &Actor,
        action: Action,
        target: OrderStatus,
    ) -> Result<(), OrderError> {
        if !actor.may(action, self) {
            return Err(OrderError::Forbidden { action });
        }

        if !self.status.can_transition_to(target) {
            return Err(OrderError::InvalidState {
                action,
                status: self.status,
                required: target.source().unwrap_or(target),
            });
        }

        Ok(())
    }

    /// Creator places the draft for moderation.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Forbidden`]: `actor` is not the creator.
    /// - [`OrderError::InvalidState`]: the order is not a draft.
    /// - [`OrderError::Validation`]: every missing client field, plus
    ///   `lines` when the order is empty.
    pub fn submit(
        &mut self,
        actor: &Actor,
        line_count: usize,
        now: Timestamp,
    ) -> Result<(), OrderError> {
        self.ensure_transition(actor, Action::Submit, OrderStatus::Formed)?;

        let missing = MissingFields::check(&self.client, line_count);

        if !missing.is_empty() {
            return Err(OrderError::Validation(missing));
        }

        self.status = OrderStatus::Formed;
        self.formed_at = Some(now);

        Ok(())
    }

    /// Moderator completes a formed order, pricing every line and deriving
    /// the total and the delivery date.
    ///
    /// `current_price` supplies each property's present price; lines whose
    /// property is unknown keep the price they captured. Returns the repriced
    /// lines, which must be stored together with the order.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Forbidden`]: `actor` is not a moderator.
    /// - [`OrderError::InvalidState`]: the order is not formed.
    /// - [`OrderError::Pricing`]: a price or the date overflowed.
    pub fn approve<F>(
        &mut self,
        actor: &Actor,
        lines: &[OrderLine],
        current_price: F,
        now: Timestamp,
    ) -> Result<Vec<OrderLine>, OrderError>
    where
        F: Fn(PropertyUuid) -> Option<Decimal>,
    {
        self.ensure_transition(actor, Action::Approve, OrderStatus::Completed)?;

        let mut priced = lines.to_vec();

        for line in &mut priced {
            let unit_price = current_price(line.property).unwrap_or(line.unit_price);

            line.reprice(unit_price)?;
        }

        let total = pricing::order_total(
            priced.iter().map(|line| line.final_price),
            self.payment_method(),
        )?;

        let delivery = pricing::delivery_date(priced.len(), now)?;

        self.status = OrderStatus::Completed;
        self.completed_at = Some(now);
        self.moderator = actor.user();
        self.total_price = total;
        self.estimated_delivery_date = Some(delivery);

        Ok(priced)
    }

    /// Moderator turns a formed order down. Prices are left as they are.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Forbidden`]: `actor` is not a moderator.
    /// - [`OrderError::InvalidState`]: the order is not formed.
    pub fn reject(&mut self, actor: &Actor, now: Timestamp) -> Result<(), OrderError> {
        self.ensure_transition(actor, Action::Reject, OrderStatus::Rejected)?;

        self.status = OrderStatus::Rejected;
        self.completed_at = Some(now);
        self.moderator = actor.user();

        Ok(())
    }

    /// Creator or moderator discards a draft. Only the status changes.
    ///
    /// # Errors
    ///
    /// - [`OrderError::Forbidden`]: `actor` is neither creator nor moderator.
    /// - [`OrderError::InvalidState`]: the order is not a draft.
    pub fn soft_delete(&mut self, actor: &Actor) -> Result<(), OrderError> {
        self.ensure_transition(actor, Action::Delete, OrderStatus::Deleted)?;

        self.status = OrderStatus::Deleted;

        Ok(())
    }
}
