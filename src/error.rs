//! Error types for the cellar core.

use crate::types::BottleId;
use thiserror::Error;

/// Main error type for cellar operations.
#[derive(Debug, Error)]
pub enum CellarError {
    #[error("Insufficient quantity: requested {requested}, available {available}")]
    InsufficientQuantity { requested: u32, available: u32 },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Bottle not found: {0}")]
    BottleNotFound(BottleId),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),
}

impl From<serde_json::Error> for CellarError {
    fn from(e: serde_json::Error) -> Self {
        CellarError::Serialization(e.to_string())
    }
}

/// Result type for cellar operations.
pub type Result<T> = std::result::Result<T, CellarError>;
