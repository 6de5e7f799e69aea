//! # stockmate-core: Pure Business Logic for StockMate
//!
//! This crate holds the only real business rules of the StockMate weighing
//! application: turning a raw scale reading into net/expected weights and a
//! tolerance verdict, gating out-of-tolerance entries behind an explicit
//! confirmation, and summarizing batches of recorded entries for reports.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StockMate Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │    Entry Form ──► Tolerance Modal ──► Entry Table ──► PDF      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ serde / ts-rs records                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockmate-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │ tolerance │  │   batch   │  │ submission │  │  report  │  │   │
//! │  │   │ evaluate  │  │ summarize │  │ state      │  │  rows    │  │   │
//! │  │   │ classify  │  │           │  │ machine    │  │  footer  │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              stockmate-store (Storage Collaborator)             │   │
//! │  │          authoritative entry list, masters, registry            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`tolerance`] - Net/expected weight and the Within/Below/Above verdict
//! - [`batch`] - Totals and mean absolute deviation over recorded entries
//! - [`submission`] - Drafting → PendingConfirmation → Committed flow
//! - [`types`] - Domain records (Item, BagType, Polisher, MaterialEntry)
//! - [`validation`] - Form-layer checks run before evaluation
//! - [`report`] - Report rows and fixed-decimal formatting
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockmate_core::tolerance::{ToleranceEngine, Verdict, WeighingInput};
//!
//! let engine = ToleranceEngine::default(); // 2%
//! let result = engine.evaluate(&WeighingInput {
//!     gross_weight: 20.0,
//!     bag_weight: 1.6,
//!     dozens: 6,
//!     standard_weight_per_dozen: 3.0,
//! });
//!
//! // 18.4 kg net against 18.0 kg expected: 0.4 kg over a 0.36 kg band
//! assert_eq!(result.verdict, Verdict::Above);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod error;
pub mod report;
pub mod submission;
pub mod tolerance;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use batch::{summarize, BatchSummary, WeighedRecord};
pub use error::{CoreError, CoreResult, ValidationError};
pub use submission::{CommittedEntry, EntryDraft, SubmitOutcome, Submission, SubmissionState};
pub use tolerance::{
    classify, evaluate, ToleranceEngine, ToleranceFraction, ToleranceResult, Verdict,
    WeighingInput,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tolerance band as a fraction of the expected weight (2%).
///
/// ## Business Reason
/// Every variant of the weighing form used a "within 2%" rule. Deployments
/// override it through `StoreConfig`; the engine never hard-codes it.
pub const DEFAULT_TOLERANCE_FRACTION: f64 = 0.02;

/// Decimal places used for weights on screen and in reports (grams precision).
pub const DISPLAY_DECIMALS: usize = 3;
