//! edustat - Step-by-step descriptive statistics and regression
//!
//! edustat computes frequency distribution tables, simple linear regression and
//! binary logistic regression, keeping every intermediate quantity so the
//! calculation can be shown, not only its answer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │  frequency   │  │    linear    │  │   logistic   │
//! │ class plans, │  │ least squares│  │   gradient   │
//! │    tables    │  │  correlation │  │ ascent, trace│
//! └──────┬───────┘  └──────┬───────┘  └──────┬───────┘
//!        │                 │                 │
//! ┌──────▼─────────────────▼─────────────────▼───────┐
//! │                     decimal                      │
//! │    exact sums and boundaries, display rounding   │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`frequency`] - Frequency tables by simple inspection or grouped classes
//!   (arbitrary count, Sturges' rule, `round(10·log10 n)`)
//! - [`linear`] - Ordinary least squares, Pearson's r, correlation scale
//! - [`logistic`] - Gradient ascent fit, sampled trace, predictions, confusion
//!   matrix, pseudo R² and odds ratio readings
//! - [`decimal`] - Decimal arithmetic and round-half-up display rounding
//! - [`error`] - [`EngineError`] shared by all modules
//!
//! # Precision
//!
//! Class boundaries, regression sums and coefficient updates are computed with
//! [`rust_decimal::Decimal`], so `0.1 + 0.2` accumulates to exactly `0.3`.
//! Results are rounded for display as the last step: 4 decimals for sums,
//! means and probabilities, 6 for coefficients and fit statistics.
//!
//! # Logging
//!
//! Fits and table builds emit `tracing` events (`debug` on completion, `trace`
//! per optimizer iteration, `warn` when a logistic fit does not converge). The
//! library never installs a subscriber.
//!
//! # Example
//!
//! ```ignore
//! use edustat::frequency::{build_frequency_table, sort_observations, Technique};
//! use edustat::linear::{fit_linear, DataPoint};
//!
//! let data = sort_observations(&[3.0, 1.0, 2.0, 3.0, 1.0, 3.0])?;
//! let table = build_frequency_table(&data, Technique::SimpleInspection)?;
//! assert_eq!(table.len(), 3);
//!
//! let fit = fit_linear(&[DataPoint::new(1.0, 2.0), DataPoint::new(2.0, 4.0)])?;
//! assert_eq!(fit.equation, "ŷ = 2x + 0");
//! ```

pub mod decimal;
pub mod error;
pub mod frequency;
pub mod linear;
pub mod logistic;

pub use error::{EngineError, EngineResult};
pub use frequency::{Technique, TableRow, build_frequency_table};
pub use linear::{DataPoint, RegressionResult, fit_linear};
pub use logistic::{
    BinaryLabel, LabeledPoint, LogisticOptions, LogisticRegressionResult, fit_logistic,
};

use serde::{Deserialize, Serialize};

/// A sampled point of a fitted curve, for plotting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Smallest and largest finite value, or `None` if there is none.
pub(crate) fn x_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|x| x.is_finite())
        .fold(None, |range, x| match range {
            None => Some((x, x)),
            Some((min, max)) => Some((f64::min(min, x), f64::max(max, x))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_range() {
        assert_eq!(x_range([3.0, -1.0, 2.5]), Some((-1.0, 3.0)));
        assert_eq!(x_range([4.0]), Some((4.0, 4.0)));
        assert_eq!(x_range([f64::NAN, 1.0]), Some((1.0, 1.0)));
        assert_eq!(x_range(Vec::new()), None);
    }
}
