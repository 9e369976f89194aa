//! `PostgreSQL` repositories.

mod orders;
mod properties;
mod records;

pub use orders::PgOrdersRepository;
pub use properties::PgPropertiesRepository;
