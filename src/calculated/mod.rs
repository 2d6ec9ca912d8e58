//! Calculated-question expression translation.
//!
//! Moodle calculated questions embed arithmetic as `{=expr}` with wildcards
//! written `{name}`. AMC documents evaluate the same arithmetic at LaTeX
//! time through the `fp` package, written here as `fp{expr}` and emitted as
//! `\FPprint{\FPeval{\out}{clip(expr)}\out}`.
//!
//! Two translators are provided:
//!
//! - [`MoodleToFp`] (`xml2fp`): Moodle text to AMC LaTeX
//! - [`FpToMoodle`] (`fp2xml`): AMC LaTeX to Moodle text
//!
//! [`CalculatedParser`] picks one of them by name, which is how converters
//! select the direction from their own configuration.
//!
//! # Example
//!
//! ```rust
//! use quizconv::calculated::CalculatedParser;
//!
//! # fn main() -> quizconv::Result<()> {
//! let mut parser = CalculatedParser::create("xml2fp")?;
//! let tex = parser.render("{=log({x})}");
//! assert_eq!(tex, r"\FPprint{\FPeval{\out}{clip(ln(\x ))}\out}");
//! assert!(!parser.has_errors());
//!
//! let mut parser = CalculatedParser::create("fp2xml")?;
//! assert_eq!(parser.render("fp{ln(x)}"), "{=log({x})}");
//! assert_eq!(parser.wildcards().map(|w| w.len()), Some(1));
//! # Ok(())
//! # }
//! ```

mod diagnostics;
mod from_fp;
mod functions;
mod grammar;
mod number;
mod options;
mod scanner;
mod to_fp;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use from_fp::FpToMoodle;
pub use number::normalize_literal;
pub use options::{CalculatedOptions, FP_MAX, FP_PRECISION};
pub use to_fp::MoodleToFp;

use crate::common::{Error, Result};

/// Translation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserKind {
    /// Moodle `{=...}` to AMC `fp`
    MoodleToFp,
    /// AMC `fp{...}` to Moodle `{=...}`
    FpToMoodle,
}

impl ParserKind {
    pub const ALL: [ParserKind; 2] = [ParserKind::MoodleToFp, ParserKind::FpToMoodle];

    /// Registry name of the direction.
    pub fn name(self) -> &'static str {
        match self {
            ParserKind::MoodleToFp => "xml2fp",
            ParserKind::FpToMoodle => "fp2xml",
        }
    }
}

impl FromStr for ParserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownParser {
                name: s.to_string(),
                available: Self::ALL.map(ParserKind::name).join(", "),
            })
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A translator in either direction.
#[derive(Debug, Clone)]
pub enum CalculatedParser {
    MoodleToFp(MoodleToFp),
    FpToMoodle(FpToMoodle),
}

impl CalculatedParser {
    /// Create a translator from its registry name (`xml2fp` or `fp2xml`).
    pub fn create(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn new(kind: ParserKind) -> Self {
        match kind {
            ParserKind::MoodleToFp => CalculatedParser::MoodleToFp(MoodleToFp::new()),
            ParserKind::FpToMoodle => CalculatedParser::FpToMoodle(FpToMoodle::new()),
        }
    }

    /// Create a translator with custom literal options.
    ///
    /// Options are validated for both directions even though only `xml2fp`
    /// rewrites literals.
    pub fn with_options(kind: ParserKind, options: CalculatedOptions) -> Result<Self> {
        match kind {
            ParserKind::MoodleToFp => Ok(CalculatedParser::MoodleToFp(MoodleToFp::with_options(options)?)),
            ParserKind::FpToMoodle => {
                options.validate()?;
                Ok(CalculatedParser::FpToMoodle(FpToMoodle::new()))
            },
        }
    }

    pub fn kind(&self) -> ParserKind {
        match self {
            CalculatedParser::MoodleToFp(_) => ParserKind::MoodleToFp,
            CalculatedParser::FpToMoodle(_) => ParserKind::FpToMoodle,
        }
    }

    /// Translate every expression block of `text`.
    pub fn render(&mut self, text: &str) -> String {
        match self {
            CalculatedParser::MoodleToFp(parser) => parser.render(text),
            CalculatedParser::FpToMoodle(parser) => parser.render(text),
        }
    }

    /// Wildcards collected so far, only tracked by `fp2xml`.
    pub fn wildcards(&self) -> Option<&BTreeSet<String>> {
        match self {
            CalculatedParser::MoodleToFp(_) => None,
            CalculatedParser::FpToMoodle(parser) => Some(parser.wildcards()),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CalculatedParser::MoodleToFp(parser) => parser.diagnostics(),
            CalculatedParser::FpToMoodle(parser) => parser.diagnostics(),
        }
    }

    pub fn has_errors(&self) -> bool {
        match self {
            CalculatedParser::MoodleToFp(parser) => parser.has_errors(),
            CalculatedParser::FpToMoodle(parser) => parser.has_errors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_by_name() {
        assert_eq!(CalculatedParser::create("xml2fp").unwrap().kind(), ParserKind::MoodleToFp);
        assert_eq!(CalculatedParser::create("fp2xml").unwrap().kind(), ParserKind::FpToMoodle);
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = CalculatedParser::create("xml2tex").unwrap_err();
        assert_eq!(
            err,
            Error::UnknownParser {
                name: "xml2tex".to_string(),
                available: "xml2fp, fp2xml".to_string(),
            }
        );
        assert!(err.to_string().contains("xml2tex"));
    }

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in ParserKind::ALL {
            assert_eq!(kind.to_string().parse::<ParserKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_with_options_validates() {
        let bad = CalculatedOptions::new().with_overflow_limit(0.0);
        assert!(CalculatedParser::with_options(ParserKind::MoodleToFp, bad.clone()).is_err());
        assert!(CalculatedParser::with_options(ParserKind::FpToMoodle, bad).is_err());

        let good = CalculatedOptions::new().with_overflow_limit(10.0);
        let mut parser = CalculatedParser::with_options(ParserKind::MoodleToFp, good).unwrap();
        parser.render("{=11}");
        assert_eq!(parser.diagnostics()[0].kind, DiagnosticKind::NumericOverflow);
        assert!(!parser.has_errors());
    }

    #[test]
    fn test_wildcards_only_for_reverse() {
        let mut forward = CalculatedParser::new(ParserKind::MoodleToFp);
        forward.render("{=1+{x}}");
        assert!(forward.wildcards().is_none());

        let mut reverse = CalculatedParser::new(ParserKind::FpToMoodle);
        reverse.render("fp{1+x}");
        assert!(reverse.wildcards().is_some_and(|w| w.contains("x")));
    }

    #[test]
    fn test_errors_surface_through_facade() {
        let mut parser = CalculatedParser::new(ParserKind::FpToMoodle);
        parser.render("fp{cot(1)}");
        assert!(parser.has_errors());
        assert_eq!(parser.diagnostics().len(), 1);
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            /// Text with no block opener comes back unchanged in both directions.
            #[test]
            fn prop_text_without_blocks_is_identity(text in "[a-zA-Z0-9 .,;:()+*/-]{0,80}") {
                for kind in ParserKind::ALL {
                    let mut parser = CalculatedParser::new(kind);
                    prop_assert_eq!(parser.render(&text), text.clone());
                    prop_assert!(parser.diagnostics().is_empty());
                }
            }

            /// pow keeps its meaning across a round trip through fp.
            #[test]
            fn prop_pow_round_trip(a in 0u32..10_000, b in 0u32..10_000) {
                let moodle = format!("{{=pow({},{})}}", a, b);
                let tex = CalculatedParser::new(ParserKind::MoodleToFp).render(&moodle);
                prop_assert_eq!(&tex, &format!("\\FPprint{{\\FPeval{{\\out}}{{clip(pow({},{}))}}\\out}}", b, a));

                let inner = &tex["\\FPprint{\\FPeval{\\out}{".len()..tex.len() - "}\\out}".len()];
                let back = CalculatedParser::new(ParserKind::FpToMoodle).render(&format!("fp{{{}}}", inner));
                prop_assert_eq!(back, format!("{{=(pow({},{}))}}", a, b));
            }
        }
    }
}
