//! Orders

pub mod cart;
mod errors;
pub mod lifecycle;
pub mod models;

pub use cart::*;
pub use errors::{OrdersServiceError, Resource};
pub use lifecycle::*;

use realty::orders::{OrderStatus, OrderUuid};

use crate::repositories::{OrderSnapshot, OrdersRepository};

/// Read an order that has not been deleted.
async fn load_order(
    orders: &dyn OrdersRepository,
    order: OrderUuid,
) -> Result<OrderSnapshot, OrdersServiceError> {
    let snapshot = orders.get_order(order).await?;

    if snapshot.order.status == OrderStatus::Deleted {
        return Err(OrdersServiceError::NotFound(Resource::Order));
    }

    Ok(snapshot)
}
