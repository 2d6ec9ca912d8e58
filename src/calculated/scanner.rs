//! Locating equation blocks and variables in free text.
//!
//! A scanner looks for one opening marker. Scanners that skip math spans also
//! look for MathJax delimiters (`$$`, `\(`, `\[`) and step over the whole
//! delimited span, since TeX inside it is full of `{...}` groups that are not
//! quiz expressions.

use aho_corasick::{AhoCorasick, Input, MatchKind};
use memchr::memmem;
use once_cell::sync::Lazy;

/// MathJax delimiters as (open, close) pairs.
const MATH_DELIMITERS: [(&str, &str); 3] = [("$$", "$$"), ("\\(", "\\)"), ("\\[", "\\]")];

/// `{=...}` blocks in Moodle text
pub(crate) static MOODLE_EQUATIONS: Lazy<MarkerScanner> =
    Lazy::new(|| MarkerScanner::new("{=", true));

/// `{name}` references in Moodle text
pub(crate) static MOODLE_VARIABLES: Lazy<MarkerScanner> =
    Lazy::new(|| MarkerScanner::new("{", true));

/// `fp{...}` blocks in AMC text
pub(crate) static FP_EQUATIONS: Lazy<MarkerScanner> =
    Lazy::new(|| MarkerScanner::new("fp{", false));

/// Next point of interest found by a [`MarkerScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker {
    /// The opening marker starts at this byte offset
    Open(usize),
    /// A complete math span ending one past its closing delimiter
    Math { end: usize },
}

pub(crate) struct MarkerScanner {
    automaton: AhoCorasick,
    open: &'static str,
}

impl MarkerScanner {
    fn new(open: &'static str, skip_math: bool) -> Self {
        let mut patterns = vec![open];
        if skip_math {
            patterns.extend(MATH_DELIMITERS.iter().map(|(start, _)| *start));
        }
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(patterns)
            .expect("Failed to build marker scanner");
        Self { automaton, open }
    }

    /// The marker this scanner opens on.
    #[inline]
    pub(crate) fn open(&self) -> &'static str {
        self.open
    }

    /// Find the next marker at or after byte offset `from`.
    ///
    /// A math opener without its closing delimiter is plain text and the
    /// search continues right after it.
    pub(crate) fn next_marker(&self, text: &str, from: usize) -> Option<Marker> {
        let mut from = from;
        while from < text.len() {
            let found = self.automaton.find(Input::new(text).range(from..))?;
            let pattern = found.pattern().as_usize();
            if pattern == 0 {
                return Some(Marker::Open(found.start()));
            }

            let close = MATH_DELIMITERS[pattern - 1].1;
            match memmem::find(&text.as_bytes()[found.end()..], close.as_bytes()) {
                Some(offset) => {
                    return Some(Marker::Math {
                        end: found.end() + offset + close.len(),
                    });
                },
                None => from = found.end(),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_open_marker() {
        let text = "a {=1} b";
        assert_eq!(MOODLE_EQUATIONS.next_marker(text, 0), Some(Marker::Open(2)));
        assert_eq!(MOODLE_EQUATIONS.next_marker(text, 3), None);
        assert_eq!(MOODLE_EQUATIONS.open(), "{=");
    }

    #[test]
    fn test_math_spans_are_reported_whole() {
        let text = r"$$\frac{a}{b}$$ {=1}";
        assert_eq!(
            MOODLE_EQUATIONS.next_marker(text, 0),
            Some(Marker::Math { end: 15 })
        );
        assert_eq!(MOODLE_EQUATIONS.next_marker(text, 15), Some(Marker::Open(16)));

        let text = r"\(x\) \[y\]";
        assert_eq!(MOODLE_VARIABLES.next_marker(text, 0), Some(Marker::Math { end: 5 }));
        assert_eq!(MOODLE_VARIABLES.next_marker(text, 5), Some(Marker::Math { end: 11 }));
    }

    #[test]
    fn test_unterminated_math_is_plain_text() {
        let text = "$$ {x}";
        assert_eq!(MOODLE_VARIABLES.next_marker(text, 0), Some(Marker::Open(3)));
    }

    #[test]
    fn test_fp_scanner_ignores_math() {
        let text = "$$fp{1}$$";
        assert_eq!(FP_EQUATIONS.next_marker(text, 0), Some(Marker::Open(2)));
        assert_eq!(FP_EQUATIONS.open(), "fp{");
    }
}
