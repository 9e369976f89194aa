//! Orders service errors.

use std::fmt;

use realty::{
    access::Action,
    orders::{MissingFields, OrderError, OrderStatus},
};
use thiserror::Error;

use crate::repositories::RepositoryError;

/// What a [`OrdersServiceError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Order,
    Property,
    Line,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Order => "order",
            Self::Property => "property",
            Self::Line => "order line",
        })
    }
}

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("{0} not found")]
    NotFound(Resource),

    #[error("not allowed to {action} this order")]
    Forbidden { action: Action },

    #[error("only {required} orders may be {}; this order is {status}", .action.done())]
    InvalidState {
        action: Action,
        status: OrderStatus,
        required: OrderStatus,
    },

    #[error("missing required fields: {0}")]
    Validation(MissingFields),

    /// Someone else changed the order first. Nothing was written.
    #[error("order was changed concurrently; reload it and try again")]
    Conflict,

    #[error("invalid data: {0}")]
    InvalidData(#[source] OrderError),

    #[error("storage error")]
    Storage(#[source] RepositoryError),
}

impl OrdersServiceError {
    /// Map a repository `NotFound` onto `resource`.
    pub(crate) fn missing(resource: Resource) -> impl FnOnce(RepositoryError) -> Self {
        move |error| match error {
            RepositoryError::NotFound => Self::NotFound(resource),
            other => other.into(),
        }
    }
}

impl From<RepositoryError> for OrdersServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => Self::NotFound(Resource::Order),
            RepositoryError::Conflict => Self::Conflict,
            other => Self::Storage(other),
        }
    }
}

impl From<OrderError> for OrdersServiceError {
    fn from(error: OrderError) -> Self {
        match error {
            OrderError::Forbidden { action } => Self::Forbidden { action },
            OrderError::InvalidState {
                action,
                status,
                required,
            } => Self::InvalidState {
                action,
                status,
                required,
            },
            OrderError::Validation(missing) => Self::Validation(missing),
            OrderError::PropertyUnavailable(_) => Self::NotFound(Resource::Property),
            OrderError::LineNotFound(_) => Self::NotFound(Resource::Line),
            other @ (OrderError::InvalidQuantity
            | OrderError::InvalidDiscount(_)
            | OrderError::Pricing(_)) => Self::InvalidData(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use realty::properties::PropertyUuid;

    use super::*;

    #[test]
    fn inactive_property_reads_as_not_found() {
        let error = OrdersServiceError::from(OrderError::PropertyUnavailable(PropertyUuid::new()));

        assert!(
            matches!(error, OrdersServiceError::NotFound(Resource::Property)),
            "expected NotFound(Property), got {error:?}"
        );
        assert_eq!(error.to_string(), "property not found");
    }

    #[test]
    fn repository_conflict_stays_distinct() {
        let error = OrdersServiceError::from(RepositoryError::Conflict);

        assert!(
            matches!(error, OrdersServiceError::Conflict),
            "expected Conflict, got {error:?}"
        );
    }
}
