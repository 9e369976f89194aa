//! Realty Domain Concerns

pub mod catalog;
pub mod orders;
