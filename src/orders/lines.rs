//! Order Lines
//!
//! A property placed into an order, with its quantity, position and price.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    orders::{OrderError, OrderUuid},
    pricing::{self, PricingError},
    properties::{self, Property, PropertyUuid},
    uuids::TypedUuid,
};

/// Order Line UUID
pub type OrderLineUuid = TypedUuid<OrderLine>;

/// Order Line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub uuid: OrderLineUuid,
    pub order: OrderUuid,
    pub property: PropertyUuid,
    pub quantity: u32,
    /// 1-based, contiguous within an order.
    pub position: u32,
    /// True exactly for the line at position 1.
    pub is_primary: bool,
    pub discount_percent: Decimal,
    /// Property price captured when the line was last priced.
    pub unit_price: Decimal,
    pub final_price: Decimal,
}

impl OrderLine {
    /// A priced, undiscounted line for `property` at `position`.
    ///
    /// # Errors
    ///
    /// - [`OrderError::InvalidQuantity`]: `quantity` is zero.
    /// - [`OrderError::Pricing`]: the price overflowed.
    pub fn new(
        order: OrderUuid,
        property: &Property,
        quantity: u32,
        position: u32,
    ) -> Result<Self, OrderError> {
        ensure_quantity(quantity)?;

        let mut line = Self {
            uuid: OrderLineUuid::new(),
            order,
            property: property.uuid,
            quantity,
            position,
            is_primary: position == 1,
            discount_percent: Decimal::ZERO,
            unit_price: property.price,
            final_price: Decimal::ZERO,
        };

        line.recompute_price()?;

        Ok(line)
    }

    /// Recompute `final_price` from quantity, discount and the captured unit
    /// price. Call after changing any of those three, and only then.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Overflow`]: the price does not fit a decimal.
    pub fn recompute_price(&mut self) -> Result<(), PricingError> {
        self.final_price =
            pricing::line_price(self.unit_price, self.quantity, self.discount_percent)?;

        Ok(())
    }

    /// Capture a new unit price and reprice.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Overflow`]: the price does not fit a decimal.
    pub fn reprice(&mut self, unit_price: Decimal) -> Result<(), PricingError> {
        self.unit_price = unit_price;
        self.recompute_price()
    }
}

/// Changes to a line's price-affecting fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineUpdate {
    pub quantity: Option<u32>,
    pub discount_percent: Option<Decimal>,
}

impl LineUpdate {
    /// Apply to `line`, repricing it if anything changed.
    ///
    /// # Errors
    ///
    /// - [`OrderError::InvalidQuantity`]: quantity is zero.
    /// - [`OrderError::InvalidDiscount`]: discount is outside `0..=100` or has
    ///   more than two decimal places.
    /// - [`OrderError::Pricing`]: the price overflowed.
    pub fn apply(&self, line: &mut OrderLine) -> Result<(), OrderError> {
        if let Some(quantity) = self.quantity {
            ensure_quantity(quantity)?;
        }

        if let Some(discount) = self.discount_percent
            && (!(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&discount)
                || !properties::fits_scale(discount))
        {
            return Err(OrderError::InvalidDiscount(discount));
        }

        if self.quantity.is_none() && self.discount_percent.is_none() {
            return Ok(());
        }

        if let Some(quantity) = self.quantity {
            line.quantity = quantity;
        }

        if let Some(discount) = self.discount_percent {
            line.discount_percent = discount;
        }

        line.recompute_price()?;

        Ok(())
    }
}

/// Reassign positions 1..=n by ascending current position and move the
/// primary flag to the first line.
pub fn renumber(lines: &mut [OrderLine]) {
    lines.sort_by_key(|line| line.position);

    for (position, line) in (1_u32..).zip(lines.iter_mut()) {
        line.position = position;
        line.is_primary = position == 1;
    }
}

fn ensure_quantity(quantity: u32) -> Result<(), OrderError> {
    if quantity == 0 {
        Err(OrderError::InvalidQuantity)
    } else {
        Ok(())
    }
}
