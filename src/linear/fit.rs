//! Ordinary least squares on `(x, y)` pairs.
//!
//! # Formulas
//!
//! **Slope (b1):**
//! ```text
//! b1 = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
//! ```
//!
//! **Intercept (b0):**
//! ```text
//! b0 = ȳ − b1·x̄
//! ```
//!
//! **Correlation coefficient (r):**
//! ```text
//! r = (n·Σxy − Σx·Σy) / √((n·Σx² − (Σx)²)(n·Σy² − (Σy)²))
//! ```
//!
//! `r` is defined as 0 when y has no variance. Every sum and ratio is
//! computed with decimals; only the result fields are rounded.

use rust_decimal::{Decimal, MathematicalOps};
use tracing::debug;

use super::{CalculationStep, DataPoint, RegressionResult};
use crate::decimal::{
    COEFFICIENT_DECIMALS, EQUATION_DECIMALS, SUMMARY_DECIMALS, checked_add, checked_div,
    checked_mul, checked_sub, format_rounded, mul_add, round_decimal, round_half_up, to_decimal,
    to_f64,
};
use crate::error::{EngineError, EngineResult};

#[derive(Default)]
struct Sums {
    x: Decimal,
    y: Decimal,
    x_squared: Decimal,
    y_squared: Decimal,
    xy: Decimal,
}

/// Fit `y = b1·x + b0` by ordinary least squares.
///
/// # Errors
/// * `InsufficientData` if fewer than two points are given
/// * `DegenerateInput` if every x is identical
/// * `Numerical` if a value is not finite or a sum overflows
pub fn fit_linear(points: &[DataPoint]) -> EngineResult<RegressionResult> {
    let n = points.len();
    if n < 2 {
        return Err(EngineError::insufficient(2, n, "fit_linear"));
    }

    let mut sums = Sums::default();
    let mut steps = Vec::with_capacity(n);
    for point in points {
        let x = to_decimal(point.x)?;
        let y = to_decimal(point.y)?;
        let x_squared = checked_mul(x, x, "x²")?;
        let y_squared = checked_mul(y, y, "y²")?;
        let xy = checked_mul(x, y, "x·y")?;

        sums.x = checked_add(sums.x, x, "Σx")?;
        sums.y = checked_add(sums.y, y, "Σy")?;
        sums.x_squared = checked_add(sums.x_squared, x_squared, "Σx²")?;
        sums.y_squared = checked_add(sums.y_squared, y_squared, "Σy²")?;
        sums.xy = checked_add(sums.xy, xy, "Σxy")?;

        steps.push(CalculationStep {
            xi: point.x,
            yi: point.y,
            xi_squared: to_f64(x_squared)?,
            yi_squared: to_f64(y_squared)?,
            xi_yi: to_f64(xy)?,
        });
    }

    let n_dec = Decimal::from(n);
    let mean_x = checked_div(sums.x, n_dec, "x̄")?;
    let mean_y = checked_div(sums.y, n_dec, "ȳ")?;

    let numerator = checked_sub(
        checked_mul(n_dec, sums.xy, "n·Σxy")?,
        checked_mul(sums.x, sums.y, "Σx·Σy")?,
        "slope numerator",
    )?;
    let ss_x = checked_sub(
        checked_mul(n_dec, sums.x_squared, "n·Σx²")?,
        checked_mul(sums.x, sums.x, "(Σx)²")?,
        "slope denominator",
    )?;
    if ss_x.is_zero() {
        return Err(EngineError::DegenerateInput {
            context: "fit_linear".to_string(),
        });
    }

    let b1 = checked_div(numerator, ss_x, "b1")?;
    let b0 = checked_sub(mean_y, checked_mul(b1, mean_x, "b1·x̄")?, "b0")?;

    let ss_y = checked_sub(
        checked_mul(n_dec, sums.y_squared, "n·Σy²")?,
        checked_mul(sums.y, sums.y, "(Σy)²")?,
        "correlation denominator",
    )?;
    let r = correlation(numerator, ss_x, ss_y)?;
    let r_squared = checked_mul(r, r, "r²")?;

    let equation = equation(to_f64(b0)?, to_f64(b1)?);

    let summary = |d: Decimal| to_f64(round_decimal(d, SUMMARY_DECIMALS));
    let coefficient = |d: Decimal| to_f64(round_decimal(d, COEFFICIENT_DECIMALS));

    let result = RegressionResult {
        n,
        sum_x: summary(sums.x)?,
        sum_y: summary(sums.y)?,
        sum_x_squared: summary(sums.x_squared)?,
        sum_y_squared: summary(sums.y_squared)?,
        sum_xy: summary(sums.xy)?,
        mean_x: summary(mean_x)?,
        mean_y: summary(mean_y)?,
        b1: coefficient(b1)?,
        b0: coefficient(b0)?,
        r: coefficient(r)?,
        r_squared: coefficient(r_squared)?,
        steps,
        equation,
    };

    debug!(
        n,
        b0 = result.b0,
        b1 = result.b1,
        r = result.r,
        "fitted linear regression"
    );
    Ok(result)
}

fn correlation(numerator: Decimal, ss_x: Decimal, ss_y: Decimal) -> EngineResult<Decimal> {
    if ss_x <= Decimal::ZERO || ss_y <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    // √ss_x · √ss_y stays in range where ss_x · ss_y would not
    let root = |ss: Decimal| {
        ss.sqrt()
            .ok_or_else(|| EngineError::numerical("square root of the correlation denominator"))
    };
    let denominator = checked_mul(root(ss_x)?, root(ss_y)?, "correlation denominator")?;
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let r = checked_div(numerator, denominator, "r")?;
    // sqrt is inexact beyond 28 digits, keep r inside [-1, 1]
    Ok(r.clamp(Decimal::NEGATIVE_ONE, Decimal::ONE))
}

fn equation(b0: f64, b1: f64) -> String {
    let sign = if round_half_up(b0, EQUATION_DECIMALS) >= 0.0 {
        '+'
    } else {
        '-'
    };
    format!(
        "ŷ = {}x {} {}",
        format_rounded(b1, EQUATION_DECIMALS),
        sign,
        format_rounded(b0.abs(), EQUATION_DECIMALS)
    )
}

/// Predicted `y = b1·x + b0`, evaluated in decimal arithmetic.
pub fn predict_y(x: f64, b0: f64, b1: f64) -> f64 {
    mul_add(b1, x, b0)
}
