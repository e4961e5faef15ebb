//! Record-level pipeline stages.
//!
//! - `normalize`: raw records -> normalized records (stable filter on year)
//! - `classify`: credit line -> acquisition label (ordered keyword rules)
//! - `decade`: year -> decade bucket
//!
//! Each stage takes its input by reference and returns a new table.

pub mod classify;
pub mod decade;
pub mod normalize;

pub use classify::*;
pub use decade::*;
pub use normalize::*;

use crate::domain::{ClassifiedRecord, NormalizedRecord};

/// Label and bucket every normalized record.
pub fn classify_records(records: &[NormalizedRecord]) -> Vec<ClassifiedRecord> {
    records
        .iter()
        .map(|r| ClassifiedRecord {
            record: r.clone(),
            acquisition_type: classify_credit_line(&r.credit_line),
            decade: decade_of(r.accession_year),
        })
        .collect()
}
