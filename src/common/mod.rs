//! Common types shared by the translators and the text utilities.

// Submodule declarations
pub mod error;

// Re-exports for convenience
pub use error::{Error, Result};
