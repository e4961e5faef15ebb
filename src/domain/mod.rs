//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw and normalized museum object records (`RawRecord`, `NormalizedRecord`)
//! - the closed acquisition label set (`AcquisitionType`)
//! - classified records and the aggregate table (`ClassifiedRecord`, `AggregateRow`)
//! - the run configuration (`AnalysisConfig`)

pub mod types;

pub use types::*;
