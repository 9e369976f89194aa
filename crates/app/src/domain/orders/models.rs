//! Order Models

use realty::orders::{Order, OrderLine};
use serde::Serialize;

use crate::repositories::OrderSnapshot;

/// An order with its lines in position order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

impl From<OrderSnapshot> for OrderDetails {
    fn from(snapshot: OrderSnapshot) -> Self {
        Self {
            order: snapshot.order,
            lines: snapshot.lines,
        }
    }
}
