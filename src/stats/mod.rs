//! Statistical test layer.
//!
//! Three independent analyses:
//!
//! - one-way ANOVA of `gift_ratio` by department (`anova`)
//! - OLS regression of `gift_ratio` on department + decade (`regression`)
//! - chi-square independence of department × acquisition type (`chisq`)
//!
//! `run_all` evaluates each one separately; a failure in one analysis is
//! recorded next to the others' results and never stops them.

pub mod anova;
pub mod chisq;
pub mod regression;

pub use anova::*;
pub use chisq::*;
pub use regression::*;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{AggregateRow, ChiSquareOptions, ClassifiedRecord};
use crate::error::StatsError;

/// Outcomes of the full battery.
#[derive(Debug, Clone)]
pub struct StatisticalReport {
    pub anova: Result<AnovaTable, StatsError>,
    pub regression: Result<RegressionResult, StatsError>,
    pub chi_square: Result<ChiSquareResult, StatsError>,
}

impl StatisticalReport {
    pub fn failures(&self) -> usize {
        [self.anova.is_err(), self.regression.is_err(), self.chi_square.is_err()]
            .into_iter()
            .filter(|&e| e)
            .count()
    }

    /// JSON-friendly view where each analysis is either a result or an error.
    pub fn to_export(&self) -> StatisticalExport<'_> {
        StatisticalExport {
            anova: ExportOutcome::from(&self.anova),
            regression: ExportOutcome::from(&self.regression),
            chi_square: ExportOutcome::from(&self.chi_square),
        }
    }
}

/// Run all three analyses.
pub fn run_all(
    rows: &[AggregateRow],
    records: &[ClassifiedRecord],
    chi_opts: &ChiSquareOptions,
) -> StatisticalReport {
    let report = StatisticalReport {
        anova: anova_gift_ratio_by_department(rows),
        regression: regress_gift_ratio(rows),
        chi_square: chi_square_department_by_type(records, chi_opts),
    };

    log_outcome("anova", &report.anova);
    log_outcome("regression", &report.regression);
    log_outcome("chi_square", &report.chi_square);
    report
}

fn log_outcome<T>(analysis: &str, outcome: &Result<T, StatsError>) {
    match outcome {
        Ok(_) => info!(analysis, "analysis completed"),
        Err(e) => warn!(analysis, kind = e.kind(), error = %e, "analysis skipped"),
    }
}

/// Values within `CONSTANT_RTOL` (relative to the first) count as equal.
const CONSTANT_RTOL: f64 = 1e-12;

/// True when every value equals the first up to round-off. Empty is constant.
pub(crate) fn is_constant(values: impl IntoIterator<Item = f64>) -> bool {
    let mut iter = values.into_iter();
    let Some(first) = iter.next() else {
        return true;
    };
    let tol = CONSTANT_RTOL * first.abs().max(1.0);
    iter.all(|v| (v - first).abs() <= tol)
}

#[derive(Debug, Serialize)]
pub struct StatisticalExport<'a> {
    pub anova: ExportOutcome<'a, AnovaTable>,
    pub regression: ExportOutcome<'a, RegressionResult>,
    pub chi_square: ExportOutcome<'a, ChiSquareResult>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExportOutcome<'a, T> {
    Ok { result: &'a T },
    Error { kind: &'static str, message: String },
}

impl<'a, T> From<&'a Result<T, StatsError>> for ExportOutcome<'a, T> {
    fn from(value: &'a Result<T, StatsError>) -> Self {
        match value {
            Ok(result) => ExportOutcome::Ok { result },
            Err(e) => ExportOutcome::Error {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AcquisitionType, NormalizedRecord};

    #[test]
    fn failures_are_isolated() {
        // One department only: ANOVA and chi-square fail, regression fails on
        // too few rows, and none of this panics or short-circuits.
        let records = vec![ClassifiedRecord {
            record: NormalizedRecord {
                object_id: "1".to_string(),
                department: "Arms".to_string(),
                credit_line: "Gift".to_string(),
                accession_year: 1950,
            },
            acquisition_type: AcquisitionType::Philanthropy,
            decade: 1950,
        }];
        let rows = crate::aggregate::aggregate(&records);
        let report = run_all(&rows, &records, &ChiSquareOptions::default());
        assert_eq!(report.failures(), 3);
        assert!(matches!(report.anova, Err(StatsError::InsufficientData(_))));
        assert!(matches!(report.chi_square, Err(StatsError::InsufficientData(_))));
    }

    #[test]
    fn constant_detection_tolerates_round_off() {
        assert!(is_constant([0.1, 0.1, 0.3 - 0.2]));
        assert!(is_constant(std::iter::empty()));
        assert!(!is_constant([0.1, 0.1000001]));
        assert!(!is_constant([0.0, 1e-9]));
    }

    #[test]
    fn constant_ratio_fails_both_models_alike() {
        let rows: Vec<AggregateRow> = [("A", 1950), ("A", 1960), ("A", 1970), ("B", 1950), ("B", 1960)]
            .into_iter()
            .map(|(dept, decade)| AggregateRow {
                department: dept.to_string(),
                decade,
                gift_count: 1,
                purchase_count: 9,
                total_count: 10,
                gift_ratio: 0.1,
                purchase_ratio: 0.9,
            })
            .collect();
        let report = run_all(&rows, &[], &ChiSquareOptions::default());
        assert!(matches!(report.anova, Err(StatsError::DegenerateModel(_))));
        assert!(matches!(report.regression, Err(StatsError::DegenerateModel(_))));
    }

    #[test]
    fn export_tags_status() {
        let report = StatisticalReport {
            anova: Err(StatsError::InsufficientData("x".to_string())),
            regression: Err(StatsError::DegenerateModel("y".to_string())),
            chi_square: Err(StatsError::InsufficientData("z".to_string())),
        };
        let json = serde_json::to_value(report.to_export()).unwrap();
        assert_eq!(json["anova"]["status"], "error");
        assert_eq!(json["regression"]["kind"], "DegenerateModelError");
        assert_eq!(json["chi_square"]["message"], "insufficient data: z");
    }
}
