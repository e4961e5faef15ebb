//! Reporting utilities: formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the statistics code stays clean and testable
//! - output changes are localized (the golden tests live next to the formatters)

pub mod format;

pub use format::*;
