//! AMC LaTeX `fp{...}` expressions back to Moodle calculated questions.
//!
//! Bare identifiers in an `fp{...}` block are wildcards and come out as
//! `{name}`. Every wildcard met is recorded so the caller can declare the
//! dataset definitions Moodle needs.

use std::collections::BTreeSet;

use super::diagnostics::Diagnostic;
use super::functions::{self, MOODLE_PI, MOODLE_RENAMES, MOODLE_UNSUPPORTED};
use super::grammar::{self, Args, CalculatedGrammar, MatchReport, RenderLog, VariableSyntax};
use super::scanner::{FP_EQUATIONS, MarkerScanner};

/// Hooks for the fp -> Moodle direction.
#[derive(Debug, Clone, Copy, Default)]
struct MoodleGrammar;

impl MoodleGrammar {
    /// `root(n, x)` is the n-th root of x.
    fn root(&self, mut args: Args, report: &mut MatchReport) -> String {
        if args.len() != 2 {
            return functions::rename_or_report("root", &args, &MOODLE_RENAMES, &MOODLE_UNSUPPORTED, "Moodle", report);
        }
        let radicand = args.pop().unwrap_or_default();
        let degree = args.pop().unwrap_or_default();
        if degree.parse::<f64>().is_ok_and(|n| n == 2.0) {
            format!("sqrt({})", radicand)
        } else {
            format!("pow({},1/({}))", radicand, degree)
        }
    }
}

impl CalculatedGrammar for MoodleGrammar {
    const VARIABLE_SYNTAX: VariableSyntax = VariableSyntax::Bare;

    fn equations(&self) -> &'static MarkerScanner {
        &FP_EQUATIONS
    }

    fn render_literal(&self, literal: &str, _report: &mut MatchReport) -> String {
        literal.to_string()
    }

    fn render_variable(&self, name: &str, report: &mut MatchReport) -> String {
        if name == "pi" {
            return MOODLE_PI.to_string();
        }
        report.push_wildcard(name);
        format!("{{{}}}", name)
    }

    fn render_atom(&self, negations: usize, atom: String) -> String {
        let mut out = "-".repeat(negations);
        out.push_str(&atom);
        out
    }

    fn render_function_call(&self, name: &str, mut args: Args, report: &mut MatchReport) -> String {
        match name {
            "root" => self.root(args, report),
            "pow" => {
                functions::swap_pow_args(&mut args);
                functions::call("pow", &args)
            },
            "neg" => format!("-({})", args.join(",")),
            "clip" => format!("({})", args.join(",")),
            "pi" => MOODLE_PI.to_string(),
            _ => functions::rename_or_report(name, &args, &MOODLE_RENAMES, &MOODLE_UNSUPPORTED, "Moodle", report),
        }
    }

    fn render_equation(&self, expr: String) -> String {
        format!("{{={}}}", expr)
    }
}

/// Translator from AMC/fp LaTeX to Moodle calculated-question text.
///
/// # Examples
///
/// ```rust
/// use quizconv::calculated::FpToMoodle;
///
/// let mut parser = FpToMoodle::new();
/// assert_eq!(parser.render("x = fp{root(2, a+b)}"), "x = {=sqrt({a}+{b})}");
/// assert!(parser.wildcards().contains("a"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FpToMoodle {
    grammar: MoodleGrammar,
    log: RenderLog,
}

impl FpToMoodle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite all `fp{...}` blocks of `text`.
    pub fn render(&mut self, text: &str) -> String {
        grammar::render_equations(&self.grammar, text, &mut self.log)
    }

    /// Every wildcard name seen by `render` so far.
    #[inline]
    pub fn wildcards(&self) -> &BTreeSet<String> {
        &self.log.wildcards
    }

    #[inline]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.log.diagnostics
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.log.has_errors()
    }
}
