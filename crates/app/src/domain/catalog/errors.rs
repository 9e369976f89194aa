//! Catalog service errors.

use realty::properties::PropertyError;
use thiserror::Error;

use crate::repositories::RepositoryError;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    /// Missing, or hidden from the catalog.
    #[error("property not found")]
    NotFound,

    #[error("property already exists")]
    AlreadyExists,

    #[error(transparent)]
    Invalid(#[from] PropertyError),

    #[error("storage error")]
    Storage(#[source] RepositoryError),
}

impl From<RepositoryError> for CatalogServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict => Self::AlreadyExists,
            other => Self::Storage(other),
        }
    }
}
