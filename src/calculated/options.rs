//! Configuration types for calculated-question translation.
//!
//! These options only affect how numeric literals are prepared for the `fp`
//! fixed-point evaluator. The reverse translator copies literals verbatim.

use crate::common::{Error, Result};

/// Largest magnitude `fp` can hold (999999999999999999.999999999999999999).
pub const FP_MAX: f64 = 1e18;

/// Number of fractional digits `fp` keeps.
pub const FP_PRECISION: usize = 18;

/// Options for numeric literal handling.
///
/// # Examples
///
/// ```rust
/// use quizconv::calculated::CalculatedOptions;
///
/// // Create with defaults
/// let options = CalculatedOptions::default();
/// assert_eq!(options.fixed_precision, 18);
///
/// // Or customize
/// let options = CalculatedOptions::new()
///     .with_overflow_limit(1e9)
///     .with_fixed_precision(12);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatedOptions {
    /// Literals whose magnitude exceeds this value raise an overflow warning
    pub overflow_limit: f64,
    /// Fractional digits used when expanding exponential notation
    pub fixed_precision: usize,
}

impl Default for CalculatedOptions {
    fn default() -> Self {
        Self {
            overflow_limit: FP_MAX,
            fixed_precision: FP_PRECISION,
        }
    }
}

impl CalculatedOptions {
    /// Create a new `CalculatedOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the magnitude above which literals are reported as overflowing.
    #[inline]
    pub fn with_overflow_limit(mut self, limit: f64) -> Self {
        self.overflow_limit = limit;
        self
    }

    /// Set the number of fractional digits used for exponential literals.
    ///
    /// Values above [`FP_PRECISION`] are rejected by [`validate`](Self::validate).
    #[inline]
    pub fn with_fixed_precision(mut self, digits: usize) -> Self {
        self.fixed_precision = digits;
        self
    }

    /// Check that the options describe something `fp` can evaluate.
    pub fn validate(&self) -> Result<()> {
        if self.overflow_limit.is_nan() || self.overflow_limit <= 0.0 {
            return Err(Error::InvalidOption(format!(
                "overflow limit must be a positive number, got {}",
                self.overflow_limit
            )));
        }
        if self.fixed_precision == 0 || self.fixed_precision > FP_PRECISION {
            return Err(Error::InvalidOption(format!(
                "fixed precision must be between 1 and {}, got {}",
                FP_PRECISION, self.fixed_precision
            )));
        }
        Ok(())
    }
}
