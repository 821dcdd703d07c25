//! Error types for firecheck-core

use thiserror::Error;

/// Result type alias using firecheck-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in firecheck-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// libSQL error
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Asset id already has a record in scope
    #[error("Asset already exists: {0}")]
    AlreadyExists(String),

    /// The store refused the operation
    #[error("Permission denied for record: {0}")]
    PermissionDenied(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
