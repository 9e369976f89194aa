//! Orders
//!
//! Draft orders accumulate property lines, then move through a fixed
//! approval lifecycle. Pricing is derived only when a moderator approves.

pub mod cart;
pub mod errors;
mod lifecycle;
pub mod lines;
pub mod order;
pub mod status;

pub use cart::{LineChange, LineRemoval};
pub use errors::OrderError;
pub use lines::{LineUpdate, OrderLine, OrderLineUuid};
pub use order::{
    ClientDetails, MissingFields, Order, OrderUuid, PaymentMethod, REQUIRED_CLIENT_FIELDS,
    RequiredField,
};
pub use status::OrderStatus;
