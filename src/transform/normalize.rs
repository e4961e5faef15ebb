//! Record normalization.
//!
//! Turns loader output into `NormalizedRecord`s that are safe to classify:
//!
//! - the accession year must parse as an integer
//! - the year must be `>= min_year`
//!
//! Anything else is dropped silently. This is a filter, not a validator: the
//! only trace of a dropped row is a counter in `NormalizeStats`.

use tracing::debug;

use crate::domain::{NormalizedRecord, RawRecord};

/// Informational counters for a normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub rows_in: usize,
    pub rows_kept: usize,
    pub missing_year: usize,
    pub invalid_year: usize,
    pub before_min_year: usize,
}

impl NormalizeStats {
    pub fn rows_dropped(&self) -> usize {
        self.rows_in - self.rows_kept
    }
}

/// Why a record did not survive normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dropped {
    MissingYear,
    InvalidYear,
    BeforeMinYear,
}

/// Normalize a slice of raw records, preserving input order.
pub fn normalize_records(raw: &[RawRecord], min_year: i32) -> (Vec<NormalizedRecord>, NormalizeStats) {
    let mut stats = NormalizeStats {
        rows_in: raw.len(),
        ..NormalizeStats::default()
    };
    let mut out = Vec::with_capacity(raw.len());

    for r in raw {
        match normalize_record(r, min_year) {
            Ok(rec) => out.push(rec),
            Err(Dropped::MissingYear) => stats.missing_year += 1,
            Err(Dropped::InvalidYear) => stats.invalid_year += 1,
            Err(Dropped::BeforeMinYear) => stats.before_min_year += 1,
        }
    }

    stats.rows_kept = out.len();
    debug!(
        kept = stats.rows_kept,
        missing_year = stats.missing_year,
        invalid_year = stats.invalid_year,
        before_min_year = stats.before_min_year,
        "normalization pass finished"
    );
    (out, stats)
}

fn normalize_record(raw: &RawRecord, min_year: i32) -> Result<NormalizedRecord, Dropped> {
    let text = raw
        .accession_year
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(Dropped::MissingYear)?;

    let year = parse_year(text).ok_or(Dropped::InvalidYear)?;
    if year < min_year {
        return Err(Dropped::BeforeMinYear);
    }

    Ok(NormalizedRecord {
        object_id: raw.object_id.clone(),
        department: raw.department.trim().to_string(),
        credit_line: raw.credit_line.clone().unwrap_or_default(),
        accession_year: year,
    })
}

/// Parse a year cell.
///
/// Accepts plain integers and integral float renderings (`"1955.0"`), which
/// spreadsheet exports emit for numeric columns with blanks.
pub fn parse_year(text: &str) -> Option<i32> {
    let text = text.trim();
    if let Ok(y) = text.parse::<i32>() {
        return Some(y);
    }
    let v = text.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() <= i32::MAX as f64 {
        Some(v as i32)
    } else {
        None
    }
}
