//! Error types for phists

use thiserror::Error;

/// phists error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An object could not be narrowed to the variant a path requires.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Variant the caller required.
        expected: &'static str,
        /// Variant that was supplied.
        found: String,
    },

    /// Booking failure or a repeated setup call.
    #[error("setup error: {0}")]
    Setup(String),

    /// Missing key in a required mapping (working point, histogram handle).
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
