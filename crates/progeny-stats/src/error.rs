//! Error types for statistical operations

use thiserror::Error;

/// Errors from statistical tests
///
/// Undefined ratios are not errors; they come back as
/// [`crate::Measure::Undefined`]. These are requests a test cannot answer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Too few observations for the requested test
    #[error("Insufficient sample: need at least {required} observations, got {actual}")]
    InsufficientSample {
        /// Minimum number of observations
        required: usize,
        /// Observations supplied
        actual: usize,
    },

    /// Every observation is identical, so the standard error is zero
    #[error("Zero variance: test statistic is undefined")]
    ZeroVariance,

    /// Contingency rows must have the same length, at least two
    #[error("Shape mismatch: contingency rows have {left} and {right} cells")]
    ShapeMismatch {
        /// Cells in the first row
        left: usize,
        /// Cells in the second row
        right: usize,
    },

    /// A parameter is outside its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
