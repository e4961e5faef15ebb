//! Error types.
//!
//! - `AppError`: run-level failures that end the process with an exit code
//!   (2 = input/config/IO, 3 = no usable data).
//! - `StatsError`: why a single statistical analysis could not be computed.
//!   The orchestrator reports it and moves on to the next analysis.

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Structural reasons a statistical analysis cannot run on the given table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// The model is not identifiable (rank-deficient design, constant predictor
    /// or response, no residual degrees of freedom).
    #[error("degenerate model: {0}")]
    DegenerateModel(String),

    /// Too few groups or observations for the test to be defined.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A distribution could not be constructed for the computed degrees of freedom.
    #[error("distribution error: {0}")]
    Distribution(String),
}

impl StatsError {
    /// Short kind label for reports and JSON exports.
    pub fn kind(&self) -> &'static str {
        match self {
            StatsError::DegenerateModel(_) => "DegenerateModelError",
            StatsError::InsufficientData(_) => "InsufficientDataError",
            StatsError::Distribution(_) => "DistributionError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_error_kind_and_message() {
        let err = StatsError::InsufficientData("only one department".to_string());
        assert_eq!(err.kind(), "InsufficientDataError");
        assert_eq!(err.to_string(), "insufficient data: only one department");
    }

    #[test]
    fn app_error_keeps_exit_code() {
        let err = AppError::new(3, "nothing left");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "nothing left");
    }
}
