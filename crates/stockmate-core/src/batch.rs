//! # Batch Aggregation
//!
//! Reduces a list of recorded entries into the totals shown in the table
//! footer and at the bottom of the PDF report.
//!
//! ## Determinism
//! Floating-point addition is not associative, so a naive running sum can
//! differ in the last bit depending on entry order. Summands are sorted with
//! [`f64::total_cmp`] before accumulation, which makes every figure a pure
//! function of the multiset of entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::tolerance::Verdict;
use crate::types::MaterialEntry;

// =============================================================================
// Weighed Record
// =============================================================================

/// The shape the aggregator needs from an evaluated weighing.
pub trait WeighedRecord {
    fn dozens(&self) -> u32;
    fn gross_weight(&self) -> f64;
    fn net_weight(&self) -> f64;
    fn difference(&self) -> f64;
    fn verdict(&self) -> Verdict;
}

impl WeighedRecord for MaterialEntry {
    fn dozens(&self) -> u32 {
        self.dozens
    }

    fn gross_weight(&self) -> f64 {
        self.gross_weight
    }

    fn net_weight(&self) -> f64 {
        self.net_weight
    }

    fn difference(&self) -> f64 {
        self.difference
    }

    fn verdict(&self) -> Verdict {
        self.verdict
    }
}

// =============================================================================
// Batch Summary
// =============================================================================

/// Aggregate figures for a set of entries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub count: usize,
    #[ts(type = "number")]
    pub total_dozens: u64,
    pub total_gross_weight: f64,
    pub total_net_weight: f64,
    /// Mean of `|difference|`; 0 for an empty batch, never NaN.
    pub avg_abs_deviation: f64,
    pub within_count: usize,
    pub below_count: usize,
    pub above_count: usize,
}

impl BatchSummary {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Entries that needed an override (Below + Above).
    pub fn out_of_tolerance_count(&self) -> usize {
        self.below_count + self.above_count
    }
}

fn ordered_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

/// Summarizes a batch of entries.
///
/// ## Rules
/// - `count`, `total_*` are plain sums (0 for an empty slice)
/// - `avg_abs_deviation` is `mean(|difference|)`, defined as 0 when empty
/// - Input order never affects the result
///
/// ## Example
/// ```rust
/// use stockmate_core::batch::summarize;
/// use stockmate_core::MaterialEntry;
///
/// let summary = summarize::<MaterialEntry>(&[]);
/// assert_eq!(summary.count, 0);
/// assert_eq!(summary.avg_abs_deviation, 0.0);
/// ```
pub fn summarize<R: WeighedRecord>(entries: &[R]) -> BatchSummary {
    if entries.is_empty() {
        return BatchSummary::default();
    }

    let count = entries.len();
    let mut summary = BatchSummary {
        count,
        total_dozens: entries.iter().map(|e| u64::from(e.dozens())).sum(),
        total_gross_weight: ordered_sum(entries.iter().map(|e| e.gross_weight()).collect()),
        total_net_weight: ordered_sum(entries.iter().map(|e| e.net_weight()).collect()),
        avg_abs_deviation: ordered_sum(entries.iter().map(|e| e.difference().abs()).collect())
            / count as f64,
        ..BatchSummary::default()
    };

    for entry in entries {
        match entry.verdict() {
            Verdict::Within => summary.within_count += 1,
            Verdict::Below => summary.below_count += 1,
            Verdict::Above => summary.above_count += 1,
        }
    }

    summary
}

/// Summaries keyed by polisher id, in id order.
pub fn summarize_by_polisher(entries: &[MaterialEntry]) -> BTreeMap<String, BatchSummary> {
    let mut groups: BTreeMap<&str, Vec<&MaterialEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.polisher_id.as_str()).or_default().push(entry);
    }

    groups
        .into_iter()
        .map(|(id, group)| (id.to_string(), summarize(&group)))
        .collect()
}

impl<R: WeighedRecord + ?Sized> WeighedRecord for &R {
    fn dozens(&self) -> u32 {
        (**self).dozens()
    }

    fn gross_weight(&self) -> f64 {
        (**self).gross_weight()
    }

    fn net_weight(&self) -> f64 {
        (**self).net_weight()
    }

    fn difference(&self) -> f64 {
        (**self).difference()
    }

    fn verdict(&self) -> Verdict {
        (**self).verdict()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
