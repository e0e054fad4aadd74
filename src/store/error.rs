//! Error types for the page store

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for page store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// LibSQL error
    #[error("LibSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// SQL query error
    #[error("SQL query error: {0}")]
    Query(String),

    /// Schema error
    #[error("Schema error: {0}")]
    Schema(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Data error
    #[error("Data error: {0}")]
    Data(String),
}

impl From<StoreError> for CrateError {
    fn from(err: StoreError) -> Self {
        CrateError::Store(err.to_string())
    }
}
