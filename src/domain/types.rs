//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while the pipeline runs
//! - exported to JSON/CSV
//! - read repeatedly by independent consumers (reports, charts, tests)

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Earliest accession year kept by the normalizer unless overridden.
pub const DEFAULT_MIN_YEAR: i32 = 1900;

/// A record as supplied by the loader, before any cleaning.
///
/// Every field except the identifier may be missing or malformed; the
/// normalizer decides what survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub object_id: String,
    pub department: String,
    pub credit_line: Option<String>,
    pub accession_year: Option<String>,
}

/// A cleaned record with a valid accession year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub object_id: String,
    pub department: String,
    /// Free-text credit line; empty when the source had none.
    pub credit_line: String,
    pub accession_year: i32,
}

/// How an acquisition was funded, as read from its credit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AcquisitionType {
    Philanthropy,
    Purchase,
    Other,
}

impl AcquisitionType {
    pub const ALL: [AcquisitionType; 3] = [
        AcquisitionType::Philanthropy,
        AcquisitionType::Purchase,
        AcquisitionType::Other,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            AcquisitionType::Philanthropy => "Philanthropy",
            AcquisitionType::Purchase => "Purchase",
            AcquisitionType::Other => "Other",
        }
    }
}

impl fmt::Display for AcquisitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A normalized record with its acquisition label and decade bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedRecord {
    pub record: NormalizedRecord,
    pub acquisition_type: AcquisitionType,
    pub decade: i64,
}

impl ClassifiedRecord {
    pub fn department(&self) -> &str {
        &self.record.department
    }
}

/// Per-(department, decade) counts and ratios.
///
/// Rows only exist for groups with at least one record, so `total_count > 0`
/// and both ratios are always defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub department: String,
    pub decade: i64,
    pub gift_count: usize,
    pub purchase_count: usize,
    pub total_count: usize,
    pub gift_ratio: f64,
    pub purchase_ratio: f64,
}

impl AggregateRow {
    /// Records in the group labeled neither Philanthropy nor Purchase.
    pub fn other_count(&self) -> usize {
        self.total_count - self.gift_count - self.purchase_count
    }
}

/// Names of the four input columns the loader reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub object_id: String,
    pub department: String,
    pub credit_line: String,
    pub accession_year: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            object_id: "Object ID".to_string(),
            department: "Department".to_string(),
            credit_line: "Credit Line".to_string(),
            accession_year: "AccessionYear".to_string(),
        }
    }
}

/// Chi-square options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiSquareOptions {
    /// Expected cell count below which the approximation is flagged.
    pub min_expected: f64,
    /// Fail instead of warn when a cell falls below `min_expected`.
    pub strict_expected: bool,
    /// Apply Yates' continuity correction to 2x2 tables.
    pub yates: bool,
}

impl Default for ChiSquareOptions {
    fn default() -> Self {
        Self {
            min_expected: 5.0,
            strict_expected: false,
            yates: false,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and environment).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    pub columns: ColumnNames,
    pub min_year: i32,

    pub chi_square: ChiSquareOptions,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_aggregate: Option<PathBuf>,
    pub export_results: Option<PathBuf>,
}

impl AnalysisConfig {
    /// Defaults for a given input file.
    pub fn for_path(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            columns: ColumnNames::default(),
            min_year: DEFAULT_MIN_YEAR,
            chi_square: ChiSquareOptions::default(),
            plot: true,
            plot_width: 80,
            plot_height: 20,
            export_aggregate: None,
            export_results: None,
        }
    }
}
