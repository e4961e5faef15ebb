//! Shared pipeline logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> normalize -> classify/bucket -> aggregate -> statistics
//!
//! The subcommands can then focus on presentation (printing vs exporting).

use std::collections::BTreeMap;

use tracing::info;

use crate::aggregate::aggregate;
use crate::domain::{AcquisitionType, AggregateRow, AnalysisConfig, ClassifiedRecord, RawRecord};
use crate::error::AppError;
use crate::io::ingest::{RowError, load_raw_records};
use crate::stats::{StatisticalReport, run_all};
use crate::transform::{NormalizeStats, classify_records, normalize_records};

/// Derived tables of one run, before statistics.
#[derive(Debug, Clone)]
pub struct PreparedTables {
    pub normalize_stats: NormalizeStats,
    pub classified: Vec<ClassifiedRecord>,
    pub aggregate: Vec<AggregateRow>,
}

/// All computed outputs of a single `acq analyze` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
    pub normalize_stats: NormalizeStats,
    pub classified: Vec<ClassifiedRecord>,
    pub aggregate: Vec<AggregateRow>,
    pub statistics: StatisticalReport,
}

impl RunOutput {
    /// Number of classified records per acquisition type.
    pub fn label_counts(&self) -> BTreeMap<AcquisitionType, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.classified {
            *counts.entry(r.acquisition_type).or_insert(0) += 1;
        }
        counts
    }
}

/// Normalize, classify, bucket and aggregate in-memory records.
///
/// Pure: the same input always produces the same tables.
pub fn prepare_tables(raw: &[RawRecord], min_year: i32) -> PreparedTables {
    let (normalized, normalize_stats) = normalize_records(raw, min_year);
    let classified = classify_records(&normalized);
    let aggregate = aggregate(&classified);

    PreparedTables {
        normalize_stats,
        classified,
        aggregate,
    }
}

/// Load the configured CSV and build the derived tables.
///
/// Returns the ingest row counts alongside the tables. Fails with exit code 3
/// when nothing survives normalization.
pub fn load_and_prepare(config: &AnalysisConfig) -> Result<(usize, Vec<RowError>, PreparedTables), AppError> {
    let ingest = load_raw_records(&config.csv_path, &config.columns)?;
    let tables = prepare_tables(&ingest.records, config.min_year);

    info!(
        kept = tables.normalize_stats.rows_kept,
        dropped = tables.normalize_stats.rows_dropped(),
        groups = tables.aggregate.len(),
        "prepared tables"
    );

    if tables.classified.is_empty() {
        return Err(AppError::new(
            3,
            format!(
                "No records remain after normalization (need an accession year >= {}).",
                config.min_year
            ),
        ));
    }

    Ok((ingest.rows_read, ingest.row_errors, tables))
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let (rows_read, row_errors, tables) = load_and_prepare(config)?;
    let statistics = run_all(&tables.aggregate, &tables.classified, &config.chi_square);

    Ok(RunOutput {
        rows_read,
        row_errors,
        normalize_stats: tables.normalize_stats,
        classified: tables.classified,
        aggregate: tables.aggregate,
        statistics,
    })
}
