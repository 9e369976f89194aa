//! Realty
//!
//! Order engine for a real-estate sales catalog: properties are collected into
//! a per-user draft order, which is then submitted, approved or rejected, with
//! prices and a delivery estimate derived on approval.

pub mod access;
pub mod catalog;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod properties;
pub mod uuids;
