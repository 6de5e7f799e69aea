//! # Tolerance Module
//!
//! Turns a raw scale reading into derived weights and a tolerance verdict.
//!
//! ## The Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  gross_weight ──┐                                                       │
//! │                 ├──► net_weight = gross - bag                           │
//! │  bag_weight ────┘            │                                          │
//! │                              ▼                                          │
//! │  dozens ────────┐      difference = net - expected   (+ = overweight)   │
//! │                 ├──► expected_weight = dozens × standard                │
//! │  standard ──────┘            │                                          │
//! │                              ▼                                          │
//! │               allowed_deviation = expected × fraction (2%)              │
//! │                              │                                          │
//! │                              ▼                                          │
//! │     net < expected - allowed   → Below                                  │
//! │     net > expected + allowed   → Above                                  │
//! │     otherwise                  → Within   (boundary is inclusive)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Floating Point
//! Weights are kilograms read off a scale, so plain `f64` arithmetic is used
//! and nothing is rounded here. Rounding to grams is a display concern
//! (see [`crate::report`]). NaN or infinite inputs flow straight through to
//! the outputs; callers that display results must guard against them.
//!
//! ## Usage
//! ```rust
//! use stockmate_core::tolerance::{evaluate, ToleranceFraction, Verdict, WeighingInput};
//!
//! let input = WeighingInput {
//!     gross_weight: 10.2,
//!     bag_weight: 0.6,
//!     dozens: 12,
//!     standard_weight_per_dozen: 0.8,
//! };
//! let result = evaluate(&input, ToleranceFraction::default());
//! assert_eq!(result.verdict, Verdict::Within);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::DEFAULT_TOLERANCE_FRACTION;

// =============================================================================
// Tolerance Fraction
// =============================================================================

/// Acceptable deviation band as a fraction of the expected weight.
///
/// 0.02 = 2%. Stored as a fraction so the engine multiplies directly.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ToleranceFraction(f64);

impl ToleranceFraction {
    /// Creates a tolerance from a fraction (0.02 = 2%).
    #[inline]
    pub const fn from_fraction(fraction: f64) -> Self {
        ToleranceFraction(fraction)
    }

    /// Creates a tolerance from a percentage (2.0 = 2%).
    #[inline]
    pub fn from_percentage(pct: f64) -> Self {
        ToleranceFraction(pct / 100.0)
    }

    /// Returns the fraction (0.02 for 2%).
    #[inline]
    pub const fn fraction(&self) -> f64 {
        self.0
    }

    /// Returns the percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 * 100.0
    }
}

impl Default for ToleranceFraction {
    fn default() -> Self {
        ToleranceFraction(DEFAULT_TOLERANCE_FRACTION)
    }
}

// =============================================================================
// Weighing Input
// =============================================================================

/// One scale reading plus the reference data needed to judge it.
///
/// Constructed per form submission; all weights in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WeighingInput {
    /// Total weight on the scale: bag plus contents. Must be > 0.
    pub gross_weight: f64,

    /// Tare weight of the bag type used. Must be >= 0.
    pub bag_weight: f64,

    /// Number of dozens in the bag. Must be > 0.
    pub dozens: u32,

    /// Reference weight of one dozen of the item. Must be >= 0.
    pub standard_weight_per_dozen: f64,
}

// =============================================================================
// Verdict
// =============================================================================

/// Tri-state tolerance classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// `|difference| <= allowed_deviation`.
    Within,
    /// Net weight is under the band.
    Below,
    /// Net weight is over the band.
    Above,
}

impl Verdict {
    /// Display text used on the entry form, the modal and in reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Verdict::Within => "Within Tolerance",
            Verdict::Below => "Below Tolerance",
            Verdict::Above => "Above Tolerance",
        }
    }

    #[inline]
    pub const fn is_within(&self) -> bool {
        matches!(self, Verdict::Within)
    }

    /// Whether the submit flow must stop and ask for an explicit override.
    #[inline]
    pub const fn requires_confirmation(&self) -> bool {
        !self.is_within()
    }
}

// =============================================================================
// Tolerance Result
// =============================================================================

/// Derived figures for one weighing. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ToleranceResult {
    /// `gross_weight - bag_weight`
    pub net_weight: f64,

    /// `dozens * standard_weight_per_dozen`
    pub expected_weight: f64,

    /// `expected_weight * fraction`
    pub allowed_deviation: f64,

    /// `net_weight - expected_weight` (positive = overweight)
    pub difference: f64,

    pub verdict: Verdict,
}

impl ToleranceResult {
    /// True when any derived figure is NaN or infinite.
    ///
    /// ## Usage
    /// Presentation layers check this before formatting numbers.
    pub fn has_non_finite(&self) -> bool {
        !(self.net_weight.is_finite()
            && self.expected_weight.is_finite()
            && self.allowed_deviation.is_finite()
            && self.difference.is_finite())
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Classifies a net weight against an expected weight and deviation band.
///
/// The band edges count as `Within`: "within 2%" includes exactly 2%.
///
/// ## Example
/// ```rust
/// use stockmate_core::tolerance::{classify, Verdict};
///
/// assert_eq!(classify(10.2, 10.0, 0.2), Verdict::Within);
/// assert_eq!(classify(10.3, 10.0, 0.2), Verdict::Above);
/// assert_eq!(classify(9.7, 10.0, 0.2), Verdict::Below);
/// ```
pub fn classify(net_weight: f64, expected_weight: f64, allowed_deviation: f64) -> Verdict {
    if net_weight < expected_weight - allowed_deviation {
        Verdict::Below
    } else if net_weight > expected_weight + allowed_deviation {
        Verdict::Above
    } else {
        Verdict::Within
    }
}

/// Computes every derived figure for one weighing.
///
/// Pure and total: no validation, no rounding, no error path. Range checks
/// belong to [`crate::validation`] and run before this is called.
///
/// When `expected_weight` is 0 the band collapses to 0 as well, so only an
/// exactly-zero net weight is `Within`.
pub fn evaluate(input: &WeighingInput, tolerance: ToleranceFraction) -> ToleranceResult {
    let net_weight = input.gross_weight - input.bag_weight;
    let expected_weight = f64::from(input.dozens) * input.standard_weight_per_dozen;
    let allowed_deviation = expected_weight * tolerance.fraction();
    let difference = net_weight - expected_weight;

    ToleranceResult {
        net_weight,
        expected_weight,
        allowed_deviation,
        difference,
        verdict: classify(net_weight, expected_weight, allowed_deviation),
    }
}

// =============================================================================
// Per-Dozen Figures
// =============================================================================

/// Average weight per dozen as shown in the entry table.
///
/// Informational only: the verdict always comes from [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PerDozenFigures {
    /// `gross_weight / dozens`
    pub product_avg_weight: f64,

    /// `product_avg_weight - standard_weight_per_dozen`
    pub tolerance_diff: f64,
}

/// Computes the per-dozen average recorded alongside each entry.
///
/// `dozens == 0` yields infinite/NaN figures, the same as any other
/// degenerate input.
pub fn per_dozen_figures(input: &WeighingInput) -> PerDozenFigures {
    let product_avg_weight = input.gross_weight / f64::from(input.dozens);
    PerDozenFigures {
        product_avg_weight,
        tolerance_diff: product_avg_weight - input.standard_weight_per_dozen,
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Tolerance evaluation bound to a configured fraction.
///
/// ## Why a struct?
/// The fraction is deployment configuration. Holding it here lets the store,
/// the submission flow and tests share one value instead of threading a
/// constant through every call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToleranceEngine {
    tolerance: ToleranceFraction,
}

impl ToleranceEngine {
    pub const fn new(tolerance: ToleranceFraction) -> Self {
        ToleranceEngine { tolerance }
    }

    #[inline]
    pub const fn tolerance(&self) -> ToleranceFraction {
        self.tolerance
    }

    /// See [`evaluate`].
    #[inline]
    pub fn evaluate(&self, input: &WeighingInput) -> ToleranceResult {
        evaluate(input, self.tolerance)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
