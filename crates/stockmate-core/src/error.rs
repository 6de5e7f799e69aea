//! # Error Types
//!
//! Domain-specific error types for stockmate-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockmate-core errors (this file)                                     │
//! │  ├── CoreError        - Submission flow / domain errors                │
//! │  └── ValidationError  - Form input failures                            │
//! │                                                                         │
//! │  stockmate-store errors (separate crate)                               │
//! │  └── StoreError       - Lookup, uniqueness, reference failures         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → Frontend             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note that [`crate::tolerance::evaluate`] has no error path at all: it is
//! total on numeric input. Everything here belongs to the layers around it.

use thiserror::Error;

use crate::submission::SubmissionState;
use crate::tolerance::Verdict;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An action was attempted in a submission state that does not allow it.
    ///
    /// ## When This Occurs
    /// - `confirm()` or `cancel()` without a pending confirmation
    /// - Editing or submitting after the entry was committed
    /// - Editing while the confirmation modal is open
    #[error("Cannot {action} while submission is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    /// An out-of-tolerance entry was committed without confirmation.
    ///
    /// ## User Workflow
    /// ```text
    /// submit() ──► verdict Above ──► PendingConfirmation
    ///                                  │
    ///                    ┌─────────────┴─────────────┐
    ///                    ▼                           ▼
    ///                cancel()                    confirm()
    ///              (Drafting)                  (Committed)
    /// ```
    #[error("{verdict:?} tolerance requires explicit confirmation")]
    ConfirmationRequired { verdict: Verdict },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub(crate) fn invalid_transition(action: &'static str, state: &SubmissionState) -> Self {
        CoreError::InvalidTransition {
            action,
            state: state.name(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the form layer before any tolerance evaluation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly greater than zero.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} cannot be negative")]
    MustBeNonNegative { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Invalid format (e.g., invalid UUID, invalid item code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
