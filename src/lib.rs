//! `acq-stats` library crate.
//!
//! The binary (`acq`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - each pipeline stage can be used on its own (normalize, classify, aggregate, test)

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod stats;
pub mod transform;
