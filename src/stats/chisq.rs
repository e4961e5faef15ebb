//! Chi-square test of independence: department × acquisition type.
//!
//! Only Philanthropy and Purchase records take part; Other is dropped before
//! counting. Departments enter the contingency table only if they have at
//! least one qualifying record, so the table never carries an all-zero row.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::domain::{AcquisitionType, ChiSquareOptions, ClassifiedRecord};
use crate::error::StatsError;
use crate::math::chi2_upper_tail;

/// Columns of the contingency table, in order.
pub const CONTINGENCY_COLUMNS: [AcquisitionType; 2] =
    [AcquisitionType::Philanthropy, AcquisitionType::Purchase];

/// Observed counts: one row per department, one column per `CONTINGENCY_COLUMNS` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContingencyTable {
    pub departments: Vec<String>,
    pub counts: Vec<[u64; 2]>,
}

impl ContingencyTable {
    /// Count qualifying records per department (sorted by department name).
    pub fn from_records(records: &[ClassifiedRecord]) -> Self {
        let mut by_dept: BTreeMap<&str, [u64; 2]> = BTreeMap::new();
        for r in records {
            let col = match r.acquisition_type {
                AcquisitionType::Philanthropy => 0,
                AcquisitionType::Purchase => 1,
                AcquisitionType::Other => continue,
            };
            by_dept.entry(r.department()).or_default()[col] += 1;
        }

        let (departments, counts) = by_dept
            .into_iter()
            .map(|(d, c)| (d.to_string(), c))
            .unzip();
        Self { departments, counts }
    }

    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|c| c[0] + c[1]).collect()
    }

    pub fn column_totals(&self) -> [u64; 2] {
        self.counts
            .iter()
            .fold([0, 0], |acc, c| [acc[0] + c[0], acc[1] + c[1]])
    }

    pub fn grand_total(&self) -> u64 {
        self.counts.iter().map(|c| c[0] + c[1]).sum()
    }

    /// Expected counts under independence.
    pub fn expected(&self) -> Vec<[f64; 2]> {
        let n = self.grand_total() as f64;
        let cols = self.column_totals();
        self.row_totals()
            .into_iter()
            .map(|r| {
                [
                    r as f64 * cols[0] as f64 / n,
                    r as f64 * cols[1] as f64 / n,
                ]
            })
            .collect()
    }
}

/// Result of the chi-square test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub df: usize,
    pub p_value: f64,
    pub table: ContingencyTable,
    pub expected: Vec<[f64; 2]>,
    /// Cells whose expected count is below the configured minimum.
    pub low_expected_cells: usize,
    pub yates_corrected: bool,
}

/// Run the test over the classified (unaggregated) records.
pub fn chi_square_department_by_type(
    records: &[ClassifiedRecord],
    opts: &ChiSquareOptions,
) -> Result<ChiSquareResult, StatsError> {
    let table = ContingencyTable::from_records(records);
    chi_square_independence(table, opts)
}

/// Pearson chi-square test on a prepared table.
pub fn chi_square_independence(
    table: ContingencyTable,
    opts: &ChiSquareOptions,
) -> Result<ChiSquareResult, StatsError> {
    let rows = table.departments.len();
    if rows < 2 {
        return Err(StatsError::InsufficientData(format!(
            "chi-square needs at least two departments with Philanthropy or Purchase records, found {rows}"
        )));
    }

    let col_totals = table.column_totals();
    for (col, total) in CONTINGENCY_COLUMNS.iter().zip(col_totals) {
        if total == 0 {
            return Err(StatsError::InsufficientData(format!(
                "no {col} records in any department; expected counts would be zero"
            )));
        }
    }

    let expected = table.expected();
    let low_expected_cells = expected
        .iter()
        .flatten()
        .filter(|&&e| e < opts.min_expected)
        .count();
    if low_expected_cells > 0 {
        if opts.strict_expected {
            return Err(StatsError::InsufficientData(format!(
                "{low_expected_cells} cell(s) have expected count < {}",
                opts.min_expected
            )));
        }
        warn!(
            cells = low_expected_cells,
            min_expected = opts.min_expected,
            "chi-square approximation may be unreliable"
        );
    }

    let df = rows - 1;
    let yates_corrected = opts.yates && df == 1;

    let mut statistic = 0.0;
    for (obs, exp) in table.counts.iter().zip(&expected) {
        for col in 0..2 {
            let mut diff = (obs[col] as f64 - exp[col]).abs();
            if yates_corrected {
                diff = (diff - 0.5).max(0.0);
            }
            statistic += diff * diff / exp[col];
        }
    }

    let p_value = chi2_upper_tail(statistic, df as f64)?;

    Ok(ChiSquareResult {
        statistic,
        df,
        p_value,
        table,
        expected,
        low_expected_cells,
        yates_corrected,
    })
}
