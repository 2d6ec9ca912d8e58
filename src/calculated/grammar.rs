//! Expression grammar shared by both translation directions.
//!
//! The grammar never builds a tree. Each production hands the text it just
//! matched to a hook of the [`CalculatedGrammar`] implementation and keeps the
//! returned replacement, so a successful match of a whole block directly
//! yields its translation.
//!
//! ```text
//! equation := OPEN expr "}"
//! expr     := atom (("+" | "-" | "*" | "/") atom)*
//! atom     := NUMBER
//!           | "-"* ( "(" expr ")" | variable | IDENT "(" [expr ("," expr)*] ")" )
//! NUMBER   := [+-]? DIGIT+ ("." DIGIT*)? ([eE] [+-]? DIGIT+)?
//! IDENT    := ALPHA (ALNUM | "_")*
//! variable := "{" IDENT "}"      (braced syntax)
//!           | IDENT              (bare syntax, not followed by "(")
//! ```
//!
//! Whitespace is allowed between tokens and dropped from the output.

use std::collections::BTreeSet;

use smallvec::SmallVec;

use super::diagnostics::Diagnostic;
use super::scanner::{Marker, MarkerScanner};

/// Rendered arguments of a function call.
pub(crate) type Args = SmallVec<[String; 2]>;

/// How a dialect writes variable references inside expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VariableSyntax {
    /// `{name}`
    Braced,
    /// `name`
    Bare,
}

/// Hooks that turn matched source text into target text.
pub(crate) trait CalculatedGrammar {
    const VARIABLE_SYNTAX: VariableSyntax;

    /// Scanner for the opening marker of an equation block.
    fn equations(&self) -> &'static MarkerScanner;

    fn render_literal(&self, literal: &str, report: &mut MatchReport) -> String;

    fn render_variable(&self, name: &str, report: &mut MatchReport) -> String;

    /// Render an atom that was prefixed by `negations` unary minus signs.
    fn render_atom(&self, negations: usize, atom: String) -> String;

    fn render_function_call(&self, name: &str, args: Args, report: &mut MatchReport) -> String;

    /// Wrap a fully rendered expression into the target block syntax.
    fn render_equation(&self, expr: String) -> String;
}

/// Side effects of a single block match.
///
/// Nothing here reaches the translator until the whole block matched, so a
/// malformed block leaves no trace.
#[derive(Debug, Default)]
pub(crate) struct MatchReport {
    wildcards: SmallVec<[String; 4]>,
    diagnostics: Vec<Diagnostic>,
}

impl MatchReport {
    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn push_wildcard(&mut self, name: &str) {
        self.wildcards.push(name.to_string());
    }

    #[cfg(test)]
    pub(crate) fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// State a translator accumulates over all its `render` calls.
#[derive(Debug, Default, Clone)]
pub(crate) struct RenderLog {
    pub(crate) wildcards: BTreeSet<String>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl RenderLog {
    /// Accept the side effects of a successful match.
    pub(crate) fn commit(&mut self, report: MatchReport) {
        for diagnostic in report.diagnostics {
            diagnostic.emit();
            self.diagnostics.push(diagnostic);
        }
        self.wildcards.extend(report.wildcards);
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Rewrite every equation block of `text`, leaving malformed blocks as they are.
pub(crate) fn render_equations<G: CalculatedGrammar>(grammar: &G, text: &str, log: &mut RenderLog) -> String {
    let scanner = grammar.equations();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut from = 0;

    while let Some(marker) = scanner.next_marker(text, from) {
        match marker {
            Marker::Math { end } => from = end,
            Marker::Open(start) => match match_equation(grammar, text, start, scanner.open().len()) {
                Some((rendered, end, report)) => {
                    out.push_str(&text[copied..start]);
                    out.push_str(&rendered);
                    log.commit(report);
                    copied = end;
                    from = end;
                },
                None => from = start + 1,
            },
        }
    }

    out.push_str(&text[copied..]);
    out
}

fn match_equation<G: CalculatedGrammar>(
    grammar: &G,
    text: &str,
    start: usize,
    open_len: usize,
) -> Option<(String, usize, MatchReport)> {
    let mut parser = ExprParser::new(grammar, text, start + open_len);
    let expr = parser.parse_expr()?;
    if !parser.eat(b'}') {
        return None;
    }
    Some((grammar.render_equation(expr), parser.pos, parser.report))
}

/// Match `{name}` at byte offset `start`, returning the name and the end offset.
pub(crate) fn braced_identifier(text: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }
    let end = identifier_end(bytes, start + 1)?;
    (bytes.get(end) == Some(&b'}')).then(|| (&text[start + 1..end], end + 1))
}

/// End offset of the identifier starting at `start`, if there is one.
fn identifier_end(bytes: &[u8], start: usize) -> Option<usize> {
    if !bytes.get(start)?.is_ascii_alphabetic() {
        return None;
    }
    let len = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    Some(start + len)
}

/// Deepest nesting of groups and call arguments a block may use.
const MAX_DEPTH: usize = 256;

struct ExprParser<'s, 'g, G> {
    grammar: &'g G,
    src: &'s str,
    pos: usize,
    depth: usize,
    report: MatchReport,
}

impl<'s, 'g, G: CalculatedGrammar> ExprParser<'s, 'g, G> {
    fn new(grammar: &'g G, src: &'s str, pos: usize) -> Self {
        Self {
            grammar,
            src,
            pos,
            depth: 0,
            report: MatchReport::default(),
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Skip whitespace and consume `expected` if it comes next.
    fn eat(&mut self, expected: u8) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Parse one expression, giving up once nesting exceeds [`MAX_DEPTH`].
    fn parse_expr(&mut self) -> Option<String> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let out = self.parse_operations();
        self.depth -= 1;
        out
    }

    fn parse_operations(&mut self) -> Option<String> {
        let mut out = self.parse_atom()?;

        loop {
            let before_op = self.pos;
            self.skip_ws();
            match self.peek() {
                Some(op @ (b'+' | b'-' | b'*' | b'/')) => {
                    self.pos += 1;
                    out.push(op as char);
                    out.push_str(&self.parse_atom()?);
                },
                _ => {
                    self.pos = before_op;
                    break;
                },
            }
        }

        Some(out)
    }

    fn parse_atom(&mut self) -> Option<String> {
        self.skip_ws();
        if let Some(literal) = self.number() {
            return Some(self.grammar.render_literal(literal, &mut self.report));
        }

        let mut negations = 0;
        while self.peek() == Some(b'-') {
            self.pos += 1;
            negations += 1;
            self.skip_ws();
        }

        let primary = self.parse_primary()?;
        Some(self.grammar.render_atom(negations, primary))
    }

    fn parse_primary(&mut self) -> Option<String> {
        match self.peek()? {
            b'(' => {
                self.pos += 1;
                let inner = self.parse_expr()?;
                self.eat(b')').then(|| format!("({})", inner))
            },
            b'{' if G::VARIABLE_SYNTAX == VariableSyntax::Braced => {
                let (name, end) = braced_identifier(self.src, self.pos)?;
                self.pos = end;
                Some(self.grammar.render_variable(name, &mut self.report))
            },
            b if b.is_ascii_alphabetic() => {
                let src = self.src;
                let start = self.pos;
                self.pos = identifier_end(src.as_bytes(), start)?;
                let name = &src[start..self.pos];

                let after_name = self.pos;
                if self.eat(b'(') {
                    return self.parse_call(name);
                }
                self.pos = after_name;

                match G::VARIABLE_SYNTAX {
                    VariableSyntax::Bare => Some(self.grammar.render_variable(name, &mut self.report)),
                    VariableSyntax::Braced => None,
                }
            },
            _ => None,
        }
    }

    /// Parse the argument list of `name`, the opening parenthesis is consumed.
    fn parse_call(&mut self, name: &str) -> Option<String> {
        let mut args = Args::new();
        if !self.eat(b')') {
            loop {
                args.push(self.parse_expr()?);
                if self.eat(b',') {
                    continue;
                }
                if self.eat(b')') {
                    break;
                }
                return None;
            }
        }
        Some(self.grammar.render_function_call(name, args, &mut self.report))
    }

    /// Consume a numeric literal at the current position.
    fn number(&mut self) -> Option<&'s str> {
        let src = self.src;
        let bytes = src.as_bytes();
        let digits_from = |i: usize| bytes[i.min(bytes.len())..].iter().take_while(|b| b.is_ascii_digit()).count();

        let start = self.pos;
        let mut end = start;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let integral = digits_from(end);
        if integral == 0 {
            return None;
        }
        end += integral;

        if bytes.get(end) == Some(&b'.') {
            end += 1;
            end += digits_from(end);
        }

        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_digits = digits_from(exp);
            if exp_digits > 0 {
                end = exp + exp_digits;
            }
        }

        self.pos = end;
        Some(&src[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculated::scanner::MOODLE_EQUATIONS;

    /// Echoes its input with every production made visible.
    struct Echo;

    impl CalculatedGrammar for Echo {
        const VARIABLE_SYNTAX: VariableSyntax = VariableSyntax::Braced;

        fn equations(&self) -> &'static MarkerScanner {
            &MOODLE_EQUATIONS
        }

        fn render_literal(&self, literal: &str, _report: &mut MatchReport) -> String {
            format!("#{}", literal)
        }

        fn render_variable(&self, name: &str, report: &mut MatchReport) -> String {
            report.push_wildcard(name);
            format!("${}", name)
        }

        fn render_atom(&self, negations: usize, atom: String) -> String {
            format!("{}{}", "~".repeat(negations), atom)
        }

        fn render_function_call(&self, name: &str, args: Args, _report: &mut MatchReport) -> String {
            format!("{}[{}]", name, args.join(";"))
        }

        fn render_equation(&self, expr: String) -> String {
            format!("<{}>", expr)
        }
    }

    fn render(text: &str) -> (String, RenderLog) {
        let mut log = RenderLog::default();
        let out = render_equations(&Echo, text, &mut log);
        (out, log)
    }

    #[test]
    fn test_productions_reach_hooks() {
        assert_eq!(render("{=1 + 2.5e3}").0, "<#1+#2.5e3>");
        assert_eq!(render("{= -({x} * f(1, {y}))}").0, "<~($x*f[#1;$y])>");
        assert_eq!(render("{=g()}").0, "<g[]>");
        assert_eq!(render("{=h(1,2,3)}").0, "<h[#1;#2;#3]>");
    }

    #[test]
    fn test_signed_numbers_are_literals() {
        assert_eq!(render("{=-1.2e-3}").0, "<#-1.2e-3>");
        assert_eq!(render("{=1 - -2}").0, "<#1-#-2>");
        assert_eq!(render("{=1-2}").0, "<#1-#2>");
    }

    #[test]
    fn test_nested_minus() {
        assert_eq!(render("{=--{x}}").0, "<~~$x>");
        assert_eq!(render("{=- 3}").0, "{=- 3}");
    }

    #[test]
    fn test_malformed_blocks_are_left_alone() {
        for text in ["{=log(log(2) + 2}", "{=1 +}", "{=}", "{=x}", "{=(1}", "{=f(1,)}", "{=1"] {
            let (out, log) = render(text);
            assert_eq!(out, text);
            assert!(log.wildcards.is_empty());
        }
    }

    #[test]
    fn test_failed_block_discards_side_effects() {
        let (out, log) = render("{=f({a}} and {={b}}");
        assert_eq!(out, "{=f({a}} and <$b>");
        assert_eq!(log.wildcards.iter().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        let nested = |depth: usize| format!("{{={}1{}}}", "(".repeat(depth), ")".repeat(depth));

        let shallow = nested(MAX_DEPTH - 1);
        assert_eq!(render(&shallow).0, format!("<{}#1{}>", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1)));

        let deep = nested(5000);
        assert_eq!(render(&deep).0, deep);

        let calls = format!("{{={}1{}}}", "f(".repeat(5000), ")".repeat(5000));
        assert_eq!(render(&calls).0, calls);
    }

    #[test]
    fn test_unbalanced_deep_block_is_left_alone() {
        let text = format!("{{={}1}} then {{=2}}", "(".repeat(5000));
        let (out, _) = render(&text);
        assert_eq!(out, format!("{{={}1}} then <#2>", "(".repeat(5000)));
    }

    #[test]
    fn test_text_around_blocks_is_kept() {
        assert_eq!(render("a {=1} b {=2}c").0, "a <#1> b <#2>c");
        assert_eq!(render("no block { = 1}").0, "no block { = 1}");
    }

    #[test]
    fn test_math_spans_are_skipped() {
        assert_eq!(render(r"\({=1}\) {=2}").0, r"\({=1}\) <#2>");
    }

    #[test]
    fn test_braced_identifier() {
        assert_eq!(braced_identifier("{x_1}", 0), Some(("x_1", 5)));
        assert_eq!(braced_identifier("a{b}", 1), Some(("b", 4)));
        assert_eq!(braced_identifier("{1x}", 0), None);
        assert_eq!(braced_identifier("{x }", 0), None);
        assert_eq!(braced_identifier("{\\out}", 0), None);
    }
}
