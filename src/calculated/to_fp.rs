//! Moodle calculated questions to AMC LaTeX with the `fp` package.
//!
//! `{=expr}` blocks become `\FPprint{\FPeval{\out}{clip(expr)}\out}` and
//! `{name}` wildcards become TeX macros `\name `. Standalone wildcards outside
//! any block are printed with `\FPprint{\name }`.

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::functions::{self, FP_PI, FP_RENAMES, FP_UNSUPPORTED};
use super::grammar::{self, Args, CalculatedGrammar, MatchReport, RenderLog, VariableSyntax};
use super::number::normalize_literal;
use super::options::CalculatedOptions;
use super::scanner::{MOODLE_EQUATIONS, MOODLE_VARIABLES, Marker, MarkerScanner};
use crate::common::Result;

/// Hooks for the Moodle -> fp direction.
#[derive(Debug, Clone, Default)]
struct FpGrammar {
    options: CalculatedOptions,
}

impl FpGrammar {
    /// Turn a wildcard name into a TeX macro name.
    ///
    /// TeX macro names cannot contain `_`, and digits end the name, which
    /// is worth a warning since the generated file then needs a manual fix.
    fn macro_name(&self, name: &str, report: &mut MatchReport) -> String {
        let cleaned = name.replace('_', "");
        if !cleaned.chars().all(|c| c.is_ascii_alphabetic()) {
            report.push_diagnostic(Diagnostic::new(
                DiagnosticKind::VariableNaming,
                format!(
                    "the variable '{}' is not compatible with LaTeX naming convention. \
                     You will need to change this name in your tex file.",
                    cleaned
                ),
            ));
        }
        format!("\\{} ", cleaned)
    }
}

impl CalculatedGrammar for FpGrammar {
    const VARIABLE_SYNTAX: VariableSyntax = VariableSyntax::Braced;

    fn equations(&self) -> &'static MarkerScanner {
        &MOODLE_EQUATIONS
    }

    fn render_literal(&self, literal: &str, report: &mut MatchReport) -> String {
        let (out, warning) = normalize_literal(literal, &self.options);
        if let Some(warning) = warning {
            report.push_diagnostic(warning);
        }
        out
    }

    fn render_variable(&self, name: &str, report: &mut MatchReport) -> String {
        self.macro_name(name, report)
    }

    /// fp has no unary minus, `-x` has to be written `neg(x)`.
    fn render_atom(&self, negations: usize, atom: String) -> String {
        if negations == 0 {
            return atom;
        }
        let mut out = String::with_capacity(atom.len() + negations * 5);
        for _ in 0..negations {
            out.push_str("neg(");
        }
        out.push_str(&atom);
        for _ in 0..negations {
            out.push(')');
        }
        out
    }

    fn render_function_call(&self, name: &str, mut args: Args, report: &mut MatchReport) -> String {
        match name {
            // fp only knows the n-th root, degree first
            "sqrt" => format!("root(2, {})", args.join(",")),
            "pow" => {
                functions::swap_pow_args(&mut args);
                functions::call("pow", &args)
            },
            "pi" => FP_PI.to_string(),
            _ => functions::rename_or_report(name, &args, &FP_RENAMES, &FP_UNSUPPORTED, "`fp` package", report),
        }
    }

    fn render_equation(&self, expr: String) -> String {
        format!("\\FPprint{{\\FPeval{{\\out}}{{clip({})}}\\out}}", expr)
    }
}

/// Translator from Moodle calculated-question text to AMC/fp LaTeX.
///
/// # Examples
///
/// ```rust
/// use quizconv::calculated::MoodleToFp;
///
/// let mut parser = MoodleToFp::new();
/// let out = parser.render("Area {=pow({r}, 2)*pi()} for {r}");
/// assert_eq!(out, r"Area \FPprint{\FPeval{\out}{clip(pow(2,\r )*\FPpi)}\out} for \FPprint{\r }");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MoodleToFp {
    grammar: FpGrammar,
    log: RenderLog,
}

impl MoodleToFp {
    /// Create a translator with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a translator with custom literal handling.
    pub fn with_options(options: CalculatedOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            grammar: FpGrammar { options },
            log: RenderLog::default(),
        })
    }

    #[inline]
    pub fn options(&self) -> &CalculatedOptions {
        &self.grammar.options
    }

    /// Rewrite all `{=...}` blocks, then all remaining `{name}` wildcards.
    pub fn render(&mut self, text: &str) -> String {
        let out = grammar::render_equations(&self.grammar, text, &mut self.log);
        self.render_variables(&out)
    }

    /// Diagnostics reported by every `render` call so far.
    #[inline]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.log.diagnostics
    }

    /// Whether any unsupported function was met.
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.log.has_errors()
    }

    fn render_variables(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut from = 0;

        while let Some(marker) = MOODLE_VARIABLES.next_marker(text, from) {
            match marker {
                Marker::Math { end } => from = end,
                Marker::Open(start) => match grammar::braced_identifier(text, start) {
                    Some((name, end)) => {
                        let mut report = MatchReport::default();
                        let rendered = self.grammar.macro_name(name, &mut report);
                        out.push_str(&text[copied..start]);
                        out.push_str("\\FPprint{");
                        out.push_str(&rendered);
                        out.push('}');
                        self.log.commit(report);
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
}
