//! Quizconv - calculated-question expression translation between Moodle and AMC
//!
//! Moodle XML quizzes embed arithmetic as `{=expr}` blocks over `{name}`
//! wildcards. Auto Multiple Choice (AMC) documents compute the same values
//! at LaTeX time with the `fp` fixed-point package. This library rewrites
//! expressions in both directions and reports what cannot be carried over.
//!
//! # Features
//!
//! - **xml2fp**: `{=pow({x}, 2)}` to `\FPprint{\FPeval{\out}{clip(pow(2,\x ))}\out}`
//! - **fp2xml**: `fp{pow(2, x)}` to `{=pow({x},2)}`, collecting the wildcards
//! - **Diagnostics**: overflow, naming and unsupported-function reports,
//!   logged through `tracing` and kept on the translator
//! - **Labels**: folding free-text question names into AMC identifiers
//!
//! # Example - Moodle to AMC
//!
//! ```rust
//! use quizconv::calculated::{CalculatedParser, ParserKind};
//!
//! let mut parser = CalculatedParser::new(ParserKind::MoodleToFp);
//! let tex = parser.render("Compute {=sqrt({a}) + 1.5e2} for {a}.");
//! assert_eq!(
//!     tex,
//!     r"Compute \FPprint{\FPeval{\out}{clip(root(2, \a )+150)}\out} for \FPprint{\a }."
//! );
//! ```
//!
//! # Example - AMC to Moodle
//!
//! ```rust
//! use quizconv::calculated::FpToMoodle;
//!
//! let mut parser = FpToMoodle::new();
//! let text = parser.render("fp{neg(arctan(rand0))}");
//! assert_eq!(text, "{=-(atan({rand0}))}");
//! assert!(parser.wildcards().contains("rand0"));
//! ```

pub mod calculated;
pub mod common;
pub mod text;

pub use calculated::{CalculatedOptions, CalculatedParser, Diagnostic, DiagnosticKind, FpToMoodle, MoodleToFp, ParserKind};
pub use common::{Error, Result};
