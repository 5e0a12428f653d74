//! Gatekeeper error types

use thiserror::Error;

/// Errors that can occur during gatekeeper operations
///
/// Bad records are not errors; they are reported as [`crate::Rejection`]s.
/// These are failures of the surrounding machinery.
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// The record source could not produce its rows
    #[error("Source error ({dataset}): {message}")]
    Source {
        /// Dataset label of the failing source
        dataset: String,
        /// Underlying error message
        message: String,
    },
}
