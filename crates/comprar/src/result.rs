//! Result and error types for Comprar.

use thiserror::Error;

/// Result type for Comprar operations
pub type ComprarResult<T> = Result<T, ComprarError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum ComprarError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation to a URL did not complete
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// An awaited element never became visible within its bound
    #[error("Element `{locator}` not visible after {ms}ms")]
    ElementNotVisible {
        /// Canonical locator description
        locator: String,
        /// Wait bound in milliseconds
        ms: u64,
    },

    /// A wait condition timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// No element matched the locator at action time
    #[error("Element not found: {locator}")]
    ElementNotFound {
        /// Canonical locator description
        locator: String,
    },

    /// Input action (click, fill, check, select) failed
    #[error("Input action failed on `{locator}`: {message}")]
    Input {
        /// Canonical locator description
        locator: String,
        /// Error message
        message: String,
    },

    /// Script evaluation in the page failed
    #[error("Evaluation failed: {message}")]
    Evaluation {
        /// Error message
        message: String,
    },

    /// Fixture file could not be loaded or parsed
    #[error("Fixture error in {path}: {message}")]
    Fixture {
        /// Offending file path
        path: String,
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
