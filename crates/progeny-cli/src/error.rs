//! Error types for the CLI application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An input file could not be read
    #[error("Cannot read {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// An input file is not a record dump
    #[error("Malformed input {path}: {source}")]
    Malformed {
        /// File that failed
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// An input file is JSON but not laid out as a record dump
    #[error(
        "Unexpected layout in {path}: expected an array of records or an object with a `records` array, found {found}"
    )]
    UnexpectedShape {
        /// File that failed
        path: PathBuf,
        /// What the file held instead
        found: String,
    },

    /// Validation error
    #[error(transparent)]
    Gatekeeper(#[from] progeny_gatekeeper::GatekeeperError),

    /// Deduplication or combination error
    #[error(transparent)]
    Curator(#[from] progeny_curator::CuratorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
