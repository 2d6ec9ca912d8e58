//! Function rewrite tables for calculated-question expressions.
//!
//! Moodle evaluates `{=...}` with PHP math functions, AMC relies on the `fp`
//! LaTeX package. Plain renames live in the maps below; calls that need a
//! structural rewrite (`pow`, `sqrt`, `root`, `pi`, `neg`, `clip`) are handled
//! by the translators before these tables are consulted.
//!
//! fp evaluator operators: + - * / pow root exp ln abs min max round trunc
//! clip neg sin cos tan cot arcsin arccos arctan arccot pi e seed random.
//! Note that fp's pow(#1,#2) returns #2 to the power of #1.

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::grammar::{Args, MatchReport};

/// Moodle name -> fp name for calls that only need a rename
pub(crate) static FP_RENAMES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "sin" => "sin",
    "cos" => "cos",
    "tan" => "tan",
    "asin" => "arcsin",
    "acos" => "arccos",
    "atan" => "arctan",
    "abs" => "abs",
    "exp" => "exp",
    "log" => "ln",
    "min" => "min",
    "max" => "max",
};

/// Moodle functions that have no fp counterpart
pub(crate) static FP_UNSUPPORTED: phf::Set<&'static str> = phf::phf_set! {
    "atan2", "atanh", "bindec", "decbin", "decoct", "deg2rad", "expm1",
    "fmod", "is_finite", "is_infinite", "is_nan", "log10", "log1p", "octdec",
    "rad2deg", "rand", "cosh", "sinh", "tanh", "acosh", "asinh", "ceil",
    "floor",
};

/// fp name -> Moodle name for calls that only need a rename
pub(crate) static MOODLE_RENAMES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "sin" => "sin",
    "cos" => "cos",
    "tan" => "tan",
    "arcsin" => "asin",
    "arccos" => "acos",
    "arctan" => "atan",
    "abs" => "abs",
    "exp" => "exp",
    "ln" => "log",
    "min" => "min",
    "max" => "max",
};

/// fp functions that have no Moodle counterpart
pub(crate) static MOODLE_UNSUPPORTED: phf::Set<&'static str> = phf::phf_set! {
    "round", "trunc", "cot", "arccot", "random", "seed",
};

/// The pi constant as `fp` spells it
pub(crate) const FP_PI: &str = "\\FPpi";

/// The pi constant as Moodle spells it
pub(crate) const MOODLE_PI: &str = "pi()";

/// Render `name(arg,arg,...)`.
#[inline]
pub(crate) fn call(name: &str, args: &Args) -> String {
    format!("{}({})", name, args.join(","))
}

/// Swap the two arguments of a power call; other arities are kept as written.
#[inline]
pub(crate) fn swap_pow_args(args: &mut Args) {
    if args.len() == 2 {
        args.swap(0, 1);
    }
}

/// Rename a call through `renames`, or keep it verbatim and report it.
///
/// `target` names the evaluator that lacks the function and is only used in
/// the diagnostic for calls listed in `unsupported`.
pub(crate) fn rename_or_report(
    name: &str,
    args: &Args,
    renames: &phf::Map<&'static str, &'static str>,
    unsupported: &phf::Set<&'static str>,
    target: &str,
    report: &mut MatchReport,
) -> String {
    if let Some(renamed) = renames.get(name) {
        return call(renamed, args);
    }

    let diagnostic = if unsupported.contains(name) {
        Diagnostic::new(
            DiagnosticKind::UnsupportedFunctionKnown,
            format!("Unsupported *function* '{}' by {} in the expression.", name, target),
        )
    } else {
        Diagnostic::new(
            DiagnosticKind::UnsupportedFunctionUnknown,
            format!("Unsupported *function* '{}' in the expression.", name),
        )
    };
    report.push_diagnostic(diagnostic);
    call(name, args)
}
