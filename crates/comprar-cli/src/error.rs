//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Driver, page, or fixture error from the library
    #[error("{0}")]
    Comprar(#[from] comprar::ComprarError),

    /// Capability missing from this build
    #[error("Unsupported: {message}")]
    Unsupported {
        /// Error message
        message: String,
    },
}
