//! Unified error types for quizconv.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
