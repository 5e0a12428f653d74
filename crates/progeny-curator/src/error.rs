//! Error types for Curator operations

use thiserror::Error;

/// Errors that can occur during Curator operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CuratorError {
    /// Two records for the same politician disagree on a count under merge-fields
    #[error("Conflicting {field} for {identity_key}: {first} vs {second}")]
    ConflictingCounts {
        /// Identity key of the group
        identity_key: String,
        /// Field name ("sons" or "daughters")
        field: &'static str,
        /// Value already merged
        first: u32,
        /// Value that disagreed with it
        second: u32,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
