use thiserror::Error;

use crate::ItemError;

/// Errors that can occur during item store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Item with id '{id}' not found")]
    NotFound { id: String },
    #[error("Item with id '{id}' already exists")]
    AlreadyExists { id: String },
    #[error("{0}")]
    Validation(String),
    #[error("Provisioning failed: {0}")]
    Provisioning(String),
    #[error("Cosmos DB not initialized")]
    NotInitialized,
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<ItemError> for StoreError {
    fn from(err: ItemError) -> Self {
        StoreError::Validation(err.to_string())
    }
}

/// Result type for item store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
