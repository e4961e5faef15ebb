//! Export the aggregate table (CSV) and the statistical results (JSON).
//!
//! Both are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use tracing::info;

use crate::domain::AggregateRow;
use crate::error::AppError;
use crate::stats::StatisticalReport;

/// Write the aggregate table to a CSV file.
pub fn write_aggregate_csv(path: &Path, rows: &[AggregateRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    info!(path = %path.display(), rows = rows.len(), "wrote aggregate table");
    Ok(())
}

/// Write all three analyses (results or errors) to a JSON file.
pub fn write_results_json(path: &Path, report: &StatisticalReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create results JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &report.to_export())
        .map_err(|e| AppError::new(2, format!("Failed to write results JSON: {e}")))?;

    info!(path = %path.display(), "wrote statistical results");
    Ok(())
}
