//! Input/output helpers.
//!
//! - CSV ingest (`ingest`)
//! - aggregate CSV + results JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
