//! Order Errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    access::Action,
    orders::{MissingFields, OrderLineUuid, OrderStatus},
    pricing::PricingError,
    properties::PropertyUuid,
};

/// Reasons a cart or lifecycle operation is refused.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The actor lacks ownership or moderator capability.
    #[error("not allowed to {action} this order")]
    Forbidden { action: Action },

    /// The order's status does not permit the action.
    #[error("only {required} orders may be {}; this order is {status}", .action.done())]
    InvalidState {
        action: Action,
        status: OrderStatus,
        required: OrderStatus,
    },

    /// Submission is missing required data.
    #[error("missing required fields: {0}")]
    Validation(MissingFields),

    /// The property is inactive or unknown.
    #[error("property {0} is not available")]
    PropertyUnavailable(PropertyUuid),

    /// The line does not exist on this order.
    #[error("line {0} not found on this order")]
    LineNotFound(OrderLineUuid),

    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Discounts are percentages between 0 and 100 with at most two decimals.
    #[error("discount must be between 0 and 100 with at most two decimal places, got {0}")]
    InvalidDiscount(Decimal),

    /// Price or date derivation failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}
