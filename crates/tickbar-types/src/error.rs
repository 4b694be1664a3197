//! Error types for tickbar.

use thiserror::Error;

/// Result type alias for tickbar operations.
pub type Result<T> = std::result::Result<T, TickbarError>;

/// Errors raised while reading ticks. Aggregation itself never fails.
#[derive(Error, Debug)]
pub enum TickbarError {
    /// A tick line could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
