//! Unified error types for quizconv.
//!
//! Only API misuse is fatal. Problems found inside a quiz text (malformed
//! blocks, unsupported functions, risky literals) are reported as
//! diagnostics and never surface here.
use thiserror::Error;

/// Main error type for quizconv operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The factory was asked for a translator it does not know
    #[error("Unknown calculated parser '{name}', expected one of: {available}")]
    UnknownParser { name: String, available: String },

    /// Translator options that cannot produce a valid conversion
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

/// Result type for quizconv operations.
pub type Result<T> = std::result::Result<T, Error>;
