//! Realty application: storage, services and wiring around the order engine.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod images;
pub mod observability;
pub mod repositories;
pub mod seed;

#[cfg(test)]
mod test;
