//! Error types for data validation in geodiary-types.

use thiserror::Error;

/// Errors that can occur when validating or decoding diary data.
///
/// This error type is platform-agnostic and does not include storage or
/// network errors (those belong in geodiary-store and geodiary-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A coordinate or accuracy value is outside its valid domain.
    #[error("Value out of range for {field}: {value}")]
    OutOfRange {
        /// The field that failed validation.
        field: &'static str,
        /// The offending value.
        value: f64,
    },

    /// A timestamp could not be coerced to millisecond-epoch form.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Result type alias using geodiary-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
