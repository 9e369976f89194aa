//! Commonly used types.

pub use crate::{
    access::{Action, Actor, UserUuid},
    catalog::{CatalogQuery, Page, SortOrder},
    orders::{
        ClientDetails, LineChange, LineUpdate, Order, OrderError, OrderLine, OrderLineUuid,
        OrderStatus, OrderUuid, PaymentMethod, RequiredField,
    },
    pricing::PricingError,
    properties::{NewProperty, Property, PropertyKind, PropertyUuid},
};
