//! Bringing incoming numbers into a descriptor's range.

use thiserror::Error;

use crate::{Bounds, Coercion};

// -----------------------------------------------------------------------------
// Error

/// A scalar that cannot be represented in the target type.
///
/// Never fatal: the parser turns it into an undefined value and skips the
/// property or element.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum CoercionFailure {
    #[error("{value} is outside of [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("{0} is not an integral value")]
    NotIntegral(f64),

    #[error("{0} is not a finite number")]
    NotFinite(f64),

    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl CoercionFailure {
    #[inline]
    pub const fn mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::Mismatch { expected, found }
    }
}

// -----------------------------------------------------------------------------
// Integers

/// Checks an integer against `bounds`.
///
/// # Examples
///
/// ```
/// use sp_policy::{Bounds, Coercion, coerce_integer};
///
/// let percent = Bounds::new(0, 100);
/// assert_eq!(coerce_integer(150, percent, Coercion::APPLY_CLAMP), Ok(100));
/// assert!(coerce_integer(150, percent, Coercion::empty()).is_err());
/// ```
pub fn coerce_integer(
    value: i64,
    bounds: Bounds<i64>,
    coercion: Coercion,
) -> Result<i64, CoercionFailure> {
    if bounds.contains(value) {
        Ok(value)
    } else if coercion.contains(Coercion::APPLY_CLAMP) {
        Ok(bounds.clamp(value))
    } else if coercion.contains(Coercion::APPLY_TRUNCATE) {
        Ok(bounds.wrap(value))
    } else {
        Err(CoercionFailure::OutOfRange {
            value: value as f64,
            min: bounds.min as f64,
            max: bounds.max as f64,
        })
    }
}

/// Converts a decimal into an integer within `bounds`.
///
/// Fractions need a rounding flag (or `APPLY_TRUNCATE`, which rounds
/// toward zero); the rounded value is then checked like any integer.
///
/// ```
/// use sp_policy::{Bounds, Coercion, coerce_decimal_to_integer};
///
/// let any = Bounds::I64;
/// assert!(coerce_decimal_to_integer(2.5, any, Coercion::empty()).is_err());
/// assert_eq!(coerce_decimal_to_integer(2.0, any, Coercion::empty()), Ok(2));
/// assert_eq!(coerce_decimal_to_integer(2.5, any, Coercion::APPLY_ROUND_FLOOR), Ok(2));
/// ```
pub fn coerce_decimal_to_integer(
    value: f64,
    bounds: Bounds<i64>,
    coercion: Coercion,
) -> Result<i64, CoercionFailure> {
    if value.is_nan() {
        return Err(CoercionFailure::NotFinite(value));
    }

    let integral = if value.is_infinite() || value.fract() == 0.0 {
        value
    } else if let Some(rounding) = coercion.rounding() {
        rounding.apply(value)
    } else if coercion.contains(Coercion::APPLY_TRUNCATE) {
        value.trunc()
    } else {
        return Err(CoercionFailure::NotIntegral(value));
    };

    // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
    if integral < i64::MIN as f64 || integral >= i64::MAX as f64 {
        return if coercion.contains(Coercion::APPLY_CLAMP) {
            Ok(if integral < 0.0 { bounds.min } else { bounds.max })
        } else if integral.is_infinite() {
            Err(CoercionFailure::NotFinite(integral))
        } else {
            Err(CoercionFailure::OutOfRange {
                value: integral,
                min: bounds.min as f64,
                max: bounds.max as f64,
            })
        };
    }

    coerce_integer(integral as i64, bounds, coercion)
}

// -----------------------------------------------------------------------------
// Decimals

/// Checks a decimal against `bounds`.
///
/// Only `APPLY_CLAMP` applies to decimals. NaN passes through untouched,
/// the elision rules decide what happens to it.
pub fn coerce_decimal(
    value: f64,
    bounds: Bounds<f64>,
    coercion: Coercion,
) -> Result<f64, CoercionFailure> {
    if value.is_nan() || bounds.contains(value) {
        Ok(value)
    } else if coercion.contains(Coercion::APPLY_CLAMP) {
        Ok(bounds.clamp(value))
    } else {
        Err(CoercionFailure::OutOfRange {
            value,
            min: bounds.min,
            max: bounds.max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const U8: Bounds<i64> = Bounds::new(0, 255);

    #[test]
    fn integer_modes() {
        let percent = Bounds::new(0, 100);
        assert_eq!(coerce_integer(42, percent, Coercion::empty()), Ok(42));
        assert_eq!(coerce_integer(150, percent, Coercion::APPLY_CLAMP), Ok(100));
        assert_eq!(coerce_integer(150, percent, Coercion::APPLY_TRUNCATE), Ok(49));
        assert!(matches!(
            coerce_integer(150, percent, Coercion::empty()),
            Err(CoercionFailure::OutOfRange { .. })
        ));
    }

    #[test]
    fn clamp_takes_precedence_over_truncate() {
        let both = Coercion::APPLY_CLAMP | Coercion::APPLY_TRUNCATE;
        assert_eq!(coerce_integer(300, U8, both), Ok(255));
    }

    #[test]
    fn rounded_values_are_rechecked() {
        let ceil = Coercion::APPLY_ROUND_CEILING;
        assert_eq!(coerce_decimal_to_integer(254.2, U8, ceil), Ok(255));
        assert!(coerce_decimal_to_integer(255.2, U8, ceil).is_err());
        assert_eq!(
            coerce_decimal_to_integer(255.2, U8, ceil | Coercion::APPLY_CLAMP),
            Ok(255)
        );
    }

    #[test]
    fn non_finite_decimals() {
        assert!(matches!(
            coerce_decimal_to_integer(f64::NAN, U8, Coercion::APPLY_CLAMP),
            Err(CoercionFailure::NotFinite(_))
        ));
        assert_eq!(
            coerce_decimal_to_integer(f64::INFINITY, U8, Coercion::APPLY_CLAMP),
            Ok(255)
        );
        assert!(coerce_decimal_to_integer(f64::NEG_INFINITY, U8, Coercion::empty()).is_err());
        assert_eq!(
            coerce_decimal_to_integer(1e30, Bounds::I64, Coercion::APPLY_CLAMP),
            Ok(i64::MAX)
        );
    }

    #[test]
    fn decimal_bounds() {
        let unit = Bounds::new(0.0, 1.0);
        assert_eq!(coerce_decimal(0.5, unit, Coercion::empty()), Ok(0.5));
        assert_eq!(coerce_decimal(1.5, unit, Coercion::APPLY_CLAMP), Ok(1.0));
        assert!(coerce_decimal(1.5, unit, Coercion::APPLY_TRUNCATE).is_err());
        assert!(coerce_decimal(f64::NAN, unit, Coercion::empty()).unwrap().is_nan());
    }
}
