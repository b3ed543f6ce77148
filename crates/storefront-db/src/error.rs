//! Database error types.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors that can occur when using the database.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open the database.
    #[error("Failed to open database: {0}")]
    OpenError(String),

    /// Failed to execute a query.
    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// The connection or the database file stayed locked past the timeout.
    #[error("Database busy: {0}")]
    Busy(String),

    /// A constraint (foreign key, CHECK, UNIQUE, NOT NULL) rejected the write.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Failed to deserialize a row.
    #[error("Deserialization error: {0}")]
    DeserializeError(String),

    /// Type conversion error.
    #[error("Type conversion error: {0}")]
    TypeError(String),

    /// No rows returned when one was expected.
    #[error("No rows returned")]
    NotFound,
}

impl DbError {
    /// Whether the error is a lock/busy timeout rather than a bad statement.
    pub fn is_busy(&self) -> bool {
        matches!(self, DbError::Busy(_))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                DbError::Busy(e.to_string())
            }
            Some(ErrorCode::ConstraintViolation) => DbError::ConstraintViolation(e.to_string()),
            Some(ErrorCode::CannotOpen) | Some(ErrorCode::NotADatabase) => {
                DbError::OpenError(e.to_string())
            }
            _ => match e {
                rusqlite::Error::QueryReturnedNoRows => DbError::NotFound,
                rusqlite::Error::FromSqlConversionFailure(..)
                | rusqlite::Error::InvalidColumnType(..)
                | rusqlite::Error::IntegralValueOutOfRange(..) => DbError::TypeError(e.to_string()),
                other => DbError::QueryError(other.to_string()),
            },
        }
    }
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::DeserializeError(e.to_string())
    }
}
