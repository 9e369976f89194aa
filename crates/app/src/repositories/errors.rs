//! Repository errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// `SQLSTATE` for `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";

/// `SQLSTATE` for `deadlock_detected`.
const DEADLOCK_DETECTED: &str = "40P01";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    /// A concurrent writer got there first: a uniqueness race, a stale
    /// revision or a serialization failure.
    #[error("conflicting concurrent update")]
    Conflict,

    #[error("related resource not found")]
    InvalidReference,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for RepositoryError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        let Some(database_error) = error.as_database_error() else {
            return Self::Sql(error);
        };

        if matches!(
            database_error.code().as_deref(),
            Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
        ) {
            return Self::Conflict;
        }

        match DatabaseError::kind(database_error) {
            ErrorKind::UniqueViolation => Self::Conflict,
            ErrorKind::ForeignKeyViolation => Self::InvalidReference,
            ErrorKind::NotNullViolation | ErrorKind::CheckViolation => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
