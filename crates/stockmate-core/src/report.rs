//! # Report Model
//!
//! The data behind the per-polisher material report: a header, one row per
//! entry and the batch totals. Rendering (table widgets, PDF layout) stays
//! with the frontend; this module only decides what the text says.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Polisher A                                              18-10-2026     │
//! │  Material Entry Report                                                  │
//! │                                                                         │
//! │  Item Code  Item Name  Bag Type  Dozens  Gross (kg)  Net (kg)  ...      │
//! │  C002       Item B     Tray      12      11.200      9.600     ...      │
//! │  ...                                                                    │
//! │                                                                         │
//! │  Total Dozens: 12                                                       │
//! │  Total Gross Weight: 11.200 kg                                          │
//! │  Total Net Weight: 9.600 kg                                             │
//! │  Average Deviation: 0.000 kg                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::batch::{summarize, BatchSummary};
use crate::types::MaterialEntry;
use crate::DISPLAY_DECIMALS;

/// Shown in place of NaN or infinite figures.
pub const NOT_AVAILABLE: &str = "N/A";

// =============================================================================
// Formatting
// =============================================================================

/// Formats a weight to a fixed number of decimals.
///
/// ## Example
/// ```rust
/// use stockmate_core::report::format_weight;
///
/// assert_eq!(format_weight(9.6, 3), "9.600");
/// assert_eq!(format_weight(f64::NAN, 3), "N/A");
/// ```
pub fn format_weight(kg: f64, decimals: usize) -> String {
    if !kg.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.*}", decimals, kg)
}

/// Formats a signed difference, with `+` for zero and overweight values.
pub fn format_signed_weight(kg: f64, decimals: usize) -> String {
    if !kg.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    // -0.0 and tiny negatives that round to zero read as +0.000
    let rounded = format!("{:.*}", decimals, kg.abs());
    let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
    if kg >= 0.0 || is_zero {
        format!("+{}", rounded)
    } else {
        format!("-{}", rounded)
    }
}

/// Renders a report date as `DD-MM-YYYY`.
pub fn format_report_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

// =============================================================================
// Report Row
// =============================================================================

/// One table row, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub item_code: String,
    pub item_name: String,
    pub bag_type: String,
    pub dozens: String,
    pub gross_weight: String,
    pub net_weight: String,
    pub expected_weight: String,
    pub difference: String,
    pub status: String,
}

impl ReportRow {
    pub const HEADERS: [&'static str; 9] = [
        "Item Code",
        "Item Name",
        "Bag Type",
        "Dozens",
        "Gross (kg)",
        "Net (kg)",
        "Expected (kg)",
        "Difference (kg)",
        "Status",
    ];

    pub fn from_entry(entry: &MaterialEntry, decimals: usize) -> Self {
        let mut status = entry.verdict.label().to_string();
        if entry.forced {
            status.push_str(" (forced)");
        }

        ReportRow {
            item_code: entry.item_code.clone(),
            item_name: entry.item_name.clone(),
            bag_type: entry.bag_type_name.clone(),
            dozens: entry.dozens.to_string(),
            gross_weight: format_weight(entry.gross_weight, decimals),
            net_weight: format_weight(entry.net_weight, decimals),
            expected_weight: format_weight(entry.expected_weight, decimals),
            difference: format_signed_weight(entry.difference, decimals),
            status,
        }
    }

    /// Cells in [`Self::HEADERS`] order.
    pub fn cells(&self) -> [&str; 9] {
        [
            self.item_code.as_str(),
            self.item_name.as_str(),
            self.bag_type.as_str(),
            self.dozens.as_str(),
            self.gross_weight.as_str(),
            self.net_weight.as_str(),
            self.expected_weight.as_str(),
            self.difference.as_str(),
            self.status.as_str(),
        ]
    }
}

// =============================================================================
// Material Report
// =============================================================================

/// A complete report for one polisher (or for all entries).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MaterialReport {
    pub title: String,
    pub polisher_name: String,
    /// `DD-MM-YYYY`
    pub generated_on: String,
    pub rows: Vec<ReportRow>,
    pub summary: BatchSummary,
    #[ts(type = "number")]
    pub decimals: usize,
}

impl MaterialReport {
    pub const TITLE: &'static str = "Material Entry Report";

    /// Builds the report using [`DISPLAY_DECIMALS`].
    pub fn build(polisher_name: &str, generated_on: NaiveDate, entries: &[MaterialEntry]) -> Self {
        Self::build_with_decimals(polisher_name, generated_on, entries, DISPLAY_DECIMALS)
    }

    pub fn build_with_decimals(
        polisher_name: &str,
        generated_on: NaiveDate,
        entries: &[MaterialEntry],
        decimals: usize,
    ) -> Self {
        MaterialReport {
            title: Self::TITLE.to_string(),
            polisher_name: polisher_name.to_string(),
            generated_on: format_report_date(generated_on),
            rows: entries
                .iter()
                .map(|e| ReportRow::from_entry(e, decimals))
                .collect(),
            summary: summarize(entries),
            decimals,
        }
    }

    /// Totals printed under the table.
    pub fn footer_lines(&self) -> Vec<String> {
        let d = self.decimals;
        vec![
            format!("Total Entries: {}", self.summary.count),
            format!("Total Dozens: {}", self.summary.total_dozens),
            format!(
                "Total Gross Weight: {} kg",
                format_weight(self.summary.total_gross_weight, d)
            ),
            format!(
                "Total Net Weight: {} kg",
                format_weight(self.summary.total_net_weight, d)
            ),
            format!(
                "Average Deviation: {} kg",
                format_weight(self.summary.avg_abs_deviation, d)
            ),
        ]
    }

    /// Suggested download name, e.g. `material_report_Polisher_A_2026-10-18.pdf`.
    pub fn file_name(&self, generated_on: NaiveDate) -> String {
        format!(
            "material_report_{}_{}.pdf",
            self.polisher_name.replace(char::is_whitespace, "_"),
            generated_on.format("%Y-%m-%d")
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::Verdict;
    use chrono::Utc;

    fn entry(code: &str, gross: f64, net: f64, expected: f64, verdict: Verdict) -> MaterialEntry {
        let now = Utc::now();
        MaterialEntry {
            id: format!("e-{code}"),
            item_id: "i".to_string(),
            item_code: code.to_string(),
            item_name: "Item B".to_string(),
            standard_weight: 0.8,
            bag_type_id: "b".to_string(),
            bag_type_name: "Tray".to_string(),
            bag_weight: 1.6,
            polisher_id: "p".to_string(),
            polisher_name: "Polisher A".to_string(),
            dozens: 12,
            gross_weight: gross,
            net_weight: net,
            expected_weight: expected,
            allowed_deviation: expected * 0.02,
            difference: net - expected,
            verdict,
            product_avg_weight: gross / 12.0,
            tolerance_diff: gross / 12.0 - 0.8,
            forced: !verdict.is_within(),
            created_by: "admin".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(18.4, 3), "18.400");
        assert_eq!(format_weight(0.19199999, 3), "0.192");
        assert_eq!(format_weight(f64::INFINITY, 3), "N/A");
    }

    #[test]
    fn test_format_signed_weight() {
        assert_eq!(format_signed_weight(0.4, 3), "+0.400");
        assert_eq!(format_signed_weight(-0.2, 3), "-0.200");
        assert_eq!(format_signed_weight(-0.0000001, 3), "+0.000");
        assert_eq!(format_signed_weight(f64::NAN, 3), "N/A");
    }

    #[test]
    fn test_format_report_date() {
        assert_eq!(format_report_date(date()), "18-10-2026");
    }

    #[test]
    fn test_row_marks_forced_entries() {
        let row = ReportRow::from_entry(&entry("C002", 20.0, 18.4, 18.0, Verdict::Above), 3);
        assert_eq!(row.status, "Above Tolerance (forced)");
        assert_eq!(row.difference, "+0.400");
        assert_eq!(row.cells()[4], "20.000");
    }

    #[test]
    fn test_report_footer() {
        let entries = vec![
            entry("C001", 20.0, 18.4, 18.0, Verdict::Above),
            entry("C002", 10.0, 9.4, 9.6, Verdict::Within),
        ];
        let report = MaterialReport::build("Polisher A", date(), &entries);

        assert_eq!(report.generated_on, "18-10-2026");
        assert_eq!(report.rows.len(), 2);
        assert_eq!(
            report.footer_lines(),
            vec![
                "Total Entries: 2".to_string(),
                "Total Dozens: 24".to_string(),
                "Total Gross Weight: 30.000 kg".to_string(),
                "Total Net Weight: 27.800 kg".to_string(),
                "Average Deviation: 0.300 kg".to_string(),
            ]
        );
        assert_eq!(
            report.file_name(date()),
            "material_report_Polisher_A_2026-10-18.pdf"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = MaterialReport::build("Polisher B", date(), &[]);
        assert!(report.rows.is_empty());
        assert!(report.footer_lines()[4].ends_with("0.000 kg"));
    }
}
