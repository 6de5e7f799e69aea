//! # Store Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError / CoreError (stockmate-core)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds lookup / reference context            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend displays user-friendly message                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stockmate_core::{CoreError, EntityKind, ValidationError};
use thiserror::Error;

use crate::config::ConfigError;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    ///
    /// ## When This Occurs
    /// - Id doesn't exist (already deleted, typo, stale page)
    /// - An entry references a master that was removed
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    /// Unique field already taken.
    ///
    /// ## When This Occurs
    /// - Creating a second item with the same code
    /// - Renaming a bag type to an existing name
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A master record is still referenced by material entries.
    #[error("{entity} {id} is used by {count} material entries")]
    StillReferenced {
        entity: EntityKind,
        id: String,
        count: usize,
    },

    /// The handler for this entity does not offer the operation.
    #[error("{entity} does not support {operation}")]
    Unsupported {
        entity: EntityKind,
        operation: &'static str,
    },

    /// No handler registered for the entity.
    #[error("No handler registered for {0}")]
    HandlerMissing(EntityKind),

    /// JSON payload did not match the expected shape.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::InvalidPayload(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
