//! Numeric literal normalization for the `fp` fixed-point evaluator.
//!
//! `fp` reads plain decimal strings only, so exponential notation has to be
//! expanded before a literal reaches `\FPeval`.

use memchr::memchr2;

use super::diagnostics::{Diagnostic, DiagnosticKind};
use super::options::CalculatedOptions;

/// Bring a matched numeric literal into a form `fp` accepts.
///
/// Returns the rewritten literal and an overflow warning when the value is
/// outside the configured range. The literal is still converted in that case.
pub fn normalize_literal(literal: &str, options: &CalculatedOptions) -> (String, Option<Diagnostic>) {
    let Ok(value) = literal.parse::<f64>() else {
        return (literal.to_string(), None);
    };

    let warning = (value.abs() > options.overflow_limit).then(|| {
        Diagnostic::new(
            DiagnosticKind::NumericOverflow,
            format!("this number {} will lead to overflow in FP", literal),
        )
    });

    let Some(exp_at) = memchr2(b'e', b'E', literal.as_bytes()) else {
        return (literal.to_string(), warning);
    };

    if value.is_finite() {
        return (to_fixed(value, options.fixed_precision), warning);
    }

    // Too large for f64, move the decimal point in the text instead.
    let expanded = shift_decimal(&literal[..exp_at], &literal[exp_at + 1..]).unwrap_or_else(|| literal.to_string());
    (expanded, warning)
}

/// Longest digit string produced by [`shift_decimal`].
const MAX_EXPANDED_DIGITS: usize = 1024;

/// Rewrite `mantissa * 10^exponent` as a plain decimal string.
///
/// Returns `None` when the exponent does not parse or the result would be
/// longer than [`MAX_EXPANDED_DIGITS`].
fn shift_decimal(mantissa: &str, exponent: &str) -> Option<String> {
    let exponent: i64 = exponent.parse().ok()?;
    let (negative, mantissa) = match mantissa.as_bytes().first() {
        Some(b'-') => (true, &mantissa[1..]),
        Some(b'+') => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let digits = format!("{}{}", int_part, frac_part);
    let point = (int_part.len() as i64).checked_add(exponent)?;
    if point.unsigned_abs() as usize > MAX_EXPANDED_DIGITS {
        return None;
    }

    let mut out = String::with_capacity(digits.len() + point.unsigned_abs() as usize + 3);
    if negative {
        out.push('-');
    }

    if point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', point.unsigned_abs() as usize));
        out.push_str(&digits);
    } else {
        let point = point as usize;
        let (whole, frac) = if point >= digits.len() {
            (digits.clone() + &"0".repeat(point - digits.len()), String::new())
        } else {
            (digits[..point].to_string(), digits[point..].to_string())
        };
        let whole = whole.trim_start_matches('0');
        out.push_str(if whole.is_empty() { "0" } else { whole });
        let frac = frac.trim_end_matches('0');
        if !frac.is_empty() {
            out.push('.');
            out.push_str(frac);
        }
        return Some(out);
    }

    let trimmed = out.trim_end_matches('0').trim_end_matches('.').len();
    out.truncate(trimmed);
    Some(out)
}

/// Print `value` with `precision` fractional digits, without trailing zeros.
fn to_fixed(value: f64, precision: usize) -> String {
    let mut out = format!("{:.*}", precision, value);
    if out.contains('.') {
        let trimmed = out.trim_end_matches('0').trim_end_matches('.').len();
        out.truncate(trimmed);
    }
    out
}
