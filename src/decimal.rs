//! Decimal-safe arithmetic.
//!
//! Everything that feeds a boundary comparison or a repeated accumulation goes
//! through [`Decimal`] instead of binary floating point, so rounding decisions
//! such as "does this value fall in this class interval" are reproducible.
//!
//! Conversions from `f64` use the shortest round-trip representation of the
//! float (`0.1_f64` becomes exactly `0.1`), which is also what the number of
//! decimal digits of an observation is measured against.
//!
//! Display rounding is round-half-up (midpoint away from zero) and is applied
//! only when a result is produced, never to values that feed later steps.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

/// Decimals used for sums and means.
pub const SUMMARY_DECIMALS: u32 = 4;

/// Decimals used for coefficients, correlation and likelihood statistics.
pub const COEFFICIENT_DECIMALS: u32 = 6;

/// Decimals used for predicted probabilities in the optimizer trace.
pub const PROBABILITY_DECIMALS: u32 = 4;

/// Decimals used when rendering a fitted equation.
pub const EQUATION_DECIMALS: u32 = 4;

/// Convert a finite `f64` to its exact shortest decimal representation.
pub fn to_decimal(x: f64) -> EngineResult<Decimal> {
    if !x.is_finite() {
        return Err(EngineError::numerical(format!(
            "cannot represent {x} as a decimal"
        )));
    }
    Decimal::from_str(&x.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(x))
        .ok_or_else(|| EngineError::numerical(format!("{x} is outside the decimal range")))
}

/// Convert a decimal back to the nearest `f64`.
pub fn to_f64(d: Decimal) -> EngineResult<f64> {
    nearest_f64(d)
        .ok_or_else(|| EngineError::numerical(format!("{d} cannot be represented as f64")))
}

// Parsing the decimal text gives the correctly rounded float, which the
// mantissa/scale conversion does not guarantee.
fn nearest_f64(d: Decimal) -> Option<f64> {
    d.to_string().parse::<f64>().ok().or_else(|| d.to_f64())
}

/// Number of digits after the decimal point in the shortest representation
/// of `x` (`2.50` counts as one, `3.0` as zero).
pub fn decimal_places(x: f64) -> EngineResult<u32> {
    Ok(to_decimal(x)?.normalize().scale())
}

/// `10^-decimals` as an exact decimal.
pub fn unit(decimals: u32) -> Decimal {
    Decimal::new(1, decimals)
}

/// Round a decimal half-up to `dp` places.
#[inline]
pub fn round_decimal(d: Decimal, dp: u32) -> Decimal {
    d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round an `f64` half-up to `dp` decimal places using decimal arithmetic.
///
/// Non-finite values and values outside the decimal range are returned
/// unchanged.
pub fn round_half_up(x: f64, dp: u32) -> f64 {
    match to_decimal(x) {
        Ok(d) => nearest_f64(round_decimal(d, dp)).unwrap_or(x),
        Err(_) => x,
    }
}

/// Render `x` rounded to `dp` places without trailing zeros (`2.0000` is
/// written `2`).
pub fn format_rounded(x: f64, dp: u32) -> String {
    match to_decimal(x) {
        Ok(d) => round_decimal(d, dp).normalize().to_string(),
        Err(_) => x.to_string(),
    }
}

/// `a + b` evaluated in decimal arithmetic, falling back to float addition
/// when either operand has no decimal representation.
pub fn add(a: f64, b: f64) -> f64 {
    let exact = to_decimal(a)
        .ok()
        .zip(to_decimal(b).ok())
        .and_then(|(a, b)| a.checked_add(b))
        .and_then(nearest_f64);
    exact.unwrap_or(a + b)
}

/// `a * x + b` evaluated in decimal arithmetic, with the same float fallback
/// as [`add`].
pub fn mul_add(a: f64, x: f64, b: f64) -> f64 {
    let exact = (|| {
        let product = to_decimal(a).ok()?.checked_mul(to_decimal(x).ok()?)?;
        nearest_f64(product.checked_add(to_decimal(b).ok()?)?)
    })();
    exact.unwrap_or(a * x + b)
}

/// `count / n` as a decimal. `n` must be non-zero.
pub fn ratio(count: usize, n: usize) -> EngineResult<Decimal> {
    Decimal::from(count)
        .checked_div(Decimal::from(n))
        .ok_or_else(|| EngineError::numerical(format!("cannot divide {count} by {n}")))
}

/// Checked decimal addition with a labelled overflow error.
pub(crate) fn checked_add(a: Decimal, b: Decimal, what: &str) -> EngineResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| EngineError::numerical(format!("overflow while accumulating {what}")))
}

/// Checked decimal subtraction with a labelled overflow error.
pub(crate) fn checked_sub(a: Decimal, b: Decimal, what: &str) -> EngineResult<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| EngineError::numerical(format!("overflow while computing {what}")))
}

/// Checked decimal multiplication with a labelled overflow error.
pub(crate) fn checked_mul(a: Decimal, b: Decimal, what: &str) -> EngineResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| EngineError::numerical(format!("overflow while computing {what}")))
}

/// Checked decimal division with a labelled error.
pub(crate) fn checked_div(a: Decimal, b: Decimal, what: &str) -> EngineResult<Decimal> {
    a.checked_div(b)
        .ok_or_else(|| EngineError::numerical(format!("cannot divide while computing {what}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_is_shortest_representation() {
        assert_eq!(to_decimal(0.1).unwrap(), Decimal::new(1, 1));
        assert_eq!(to_decimal(-2.75).unwrap(), Decimal::new(-275, 2));
        assert!(to_decimal(f64::NAN).is_err());
        assert!(to_decimal(f64::INFINITY).is_err());
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(decimal_places(3.0).unwrap(), 0);
        assert_eq!(decimal_places(2.5).unwrap(), 1);
        assert_eq!(decimal_places(0.125).unwrap(), 3);
        assert_eq!(decimal_places(-14.07).unwrap(), 2);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert_eq!(round_half_up(-2.5, 0), -3.0);
        assert_eq!(round_half_up(1.00005, 4), 1.0001);
        assert_eq!(round_half_up(0.1234565, 6), 0.123457);
        assert!(round_half_up(f64::NAN, 4).is_nan());
    }

    #[test]
    fn test_float_drift_is_avoided() {
        // 0.1 + 0.2 is 0.30000000000000004 in binary floating point
        assert_eq!(add(0.1, 0.2), 0.3);
        assert_eq!(mul_add(0.1, 3.0, 0.0), 0.3);
    }

    #[test]
    fn test_format_rounded_strips_trailing_zeros() {
        assert_eq!(format_rounded(2.0, 4), "2");
        assert_eq!(format_rounded(1.23456, 4), "1.2346");
        assert_eq!(format_rounded(-0.5, 4), "-0.5");
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(1, 4).unwrap(), Decimal::new(25, 2));
        assert!(ratio(1, 0).is_err());
    }
}
