//! Class layout for grouped frequency tables.
//!
//! # Number of classes
//!
//! ```text
//! arbitrary:    k = caller-supplied
//! Sturges:      k = round(1 + 3.322 · log10(n))
//! max-integer:  k = round(10 · log10(n))
//! ```
//!
//! # Width and boundaries
//!
//! With `d` the largest number of decimal digits among the observations and
//! `u = 10^-d`:
//!
//! ```text
//! R          = max - min + u
//! w          = round_d(R / k), bumped by u when w·k < R
//! correction = round((w·k - R) · 10^d)
//! start      = min - floor(correction / 2) · u
//! ```
//!
//! An odd correction puts the extra unit above the data rather than below it.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::Technique;
use crate::decimal::{
    checked_add, checked_div, checked_mul, checked_sub, decimal_places, round_decimal, to_decimal,
    unit,
};
use crate::error::{EngineError, EngineResult};

/// Sturges coefficient for `log10(n)`.
pub const STURGES_FACTOR: f64 = 3.322;

/// Intermediate quantities of a grouped frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassPlan {
    /// Number of observations
    pub n: usize,
    /// Number of classes (k)
    pub classes: usize,
    /// Largest number of decimal digits among the observations (d)
    pub decimals: u32,
    /// Smallest representable step, `10^-d`
    pub unit: Decimal,
    /// Smallest observation
    pub min: Decimal,
    /// Largest observation
    pub max: Decimal,
    /// Range extended by one unit (R)
    pub range: Decimal,
    /// Class width (w)
    pub width: Decimal,
    /// Surplus coverage `w·k - R`, in units
    pub correction: i64,
    /// Lower limit of the first class
    pub start: Decimal,
}

/// Number of classes a technique asks for with `n` observations.
///
/// Computed rules never return less than one class.
pub fn class_count(technique: Technique, n: usize) -> EngineResult<usize> {
    let n_f = n as f64;
    let k = match technique {
        Technique::Arbitrary { classes: 0 } => {
            return Err(EngineError::invalid_parameter(
                "classes",
                0.0,
                "must be a positive integer",
            ));
        }
        Technique::Arbitrary { classes } => return Ok(classes),
        Technique::Sturges => (1.0 + STURGES_FACTOR * n_f.log10()).round(),
        Technique::MaxInteger => (10.0 * n_f.log10()).round(),
        Technique::SimpleInspection => {
            return Err(EngineError::invalid_parameter(
                "technique",
                0.0,
                "simple inspection does not group observations into classes",
            ));
        }
    };
    Ok(k.max(1.0) as usize)
}

/// Compute the class layout for ascending `sorted` observations.
pub fn plan_classes(sorted: &[f64], technique: Technique) -> EngineResult<ClassPlan> {
    super::validate_sorted(sorted)?;
    let (first, last) = match (sorted.first(), sorted.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(EngineError::insufficient(1, 0, "plan_classes")),
    };

    let n = sorted.len();
    let classes = class_count(technique, n)?;

    let mut decimals = 0;
    for &value in sorted {
        decimals = decimals.max(decimal_places(value)?);
    }
    let unit = unit(decimals);

    let min = to_decimal(first)?;
    let max = to_decimal(last)?;
    let range = checked_add(checked_sub(max, min, "range")?, unit, "range")?;

    let k = Decimal::from(classes);
    let mut width = round_decimal(checked_div(range, k, "class width")?, decimals);
    if checked_mul(width, k, "coverage")? < range {
        width = checked_add(width, unit, "class width")?;
    }

    let surplus = checked_sub(checked_mul(width, k, "coverage")?, range, "correction")?;
    let correction = round_decimal(checked_div(surplus, unit, "correction")?, 0)
        .to_i64()
        .ok_or_else(|| EngineError::numerical("correction does not fit in an integer"))?;

    // Floor division: an odd correction leaves the extra unit at the top.
    let shift = if correction % 2 == 0 {
        correction / 2
    } else {
        (correction - 1) / 2
    };
    let start = checked_sub(
        min,
        checked_mul(Decimal::from(shift), unit, "correction")?,
        "start",
    )?;

    Ok(ClassPlan {
        n,
        classes,
        decimals,
        unit,
        min,
        max,
        range,
        width,
        correction,
        start,
    })
}
