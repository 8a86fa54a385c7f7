//! Error types for the evaluation console.
//!
//! This module defines the centralized error type [`EvalConsoleError`] and a type
//! alias [`Result`] used throughout the crate. Lifecycle operations never fail;
//! errors only arise at the edges (seed ingestion, configuration, and user input
//! that cannot be represented, such as an out-of-range score).

use thiserror::Error;

/// The main error type for evaluation console operations.
///
/// # Examples
///
/// ```
/// use eval_console::EvalConsoleError;
///
/// fn validate() -> Result<(), EvalConsoleError> {
///     Err(EvalConsoleError::Config("scorer.min_score must be a number".to_string()))
/// }
/// assert!(validate().is_err());
/// ```
#[derive(Debug, Error)]
pub enum EvalConsoleError {
    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations, typically while
    /// reading a seed file or a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The inbound log feed could not be parsed.
    #[error("Seed error in {origin}: {source}")]
    Seed {
        /// File path of the feed, or `"<inline>"` for in-memory input.
        origin: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration is invalid or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A score outside the 0-5 scale was supplied.
    #[error("Invalid score {0}: scores range from 0 to 5")]
    InvalidScore(u8),

    /// A console command line could not be understood.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// A specialized `Result` type for evaluation console operations.
pub type Result<T> = std::result::Result<T, EvalConsoleError>;
