//! Simple linear regression.
//!
//! Fits `ŷ = b1·x + b0` by ordinary least squares and keeps every
//! intermediate quantity (per-row products, sums, means) so each step of the
//! calculation can be shown.
//!
//! ```ignore
//! use edustat::linear::{fit_linear, interpret_correlation, predict_y, DataPoint};
//!
//! let points = [DataPoint::new(1.0, 2.0), DataPoint::new(2.0, 4.0), DataPoint::new(3.0, 6.0)];
//! let result = fit_linear(&points)?;
//! assert_eq!(result.b1, 2.0);
//! assert_eq!(predict_y(4.0, result.b0, result.b1), 8.0);
//! println!("{}", interpret_correlation(result.r)); // perfect positive correlation
//! ```

mod fit;
mod interpret;

pub use fit::{fit_linear, predict_y};
pub use interpret::{
    CorrelationInterpretation, CorrelationStrength, Direction, interpret_correlation,
};

use serde::{Deserialize, Serialize};

use crate::CurvePoint;

/// Share of the x range added on each side of a fitted line.
pub const LINE_PADDING: f64 = 0.1;

/// An `(x, y)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Derived quantities of one observation, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationStep {
    pub xi: f64,
    pub yi: f64,
    pub xi_squared: f64,
    pub yi_squared: f64,
    pub xi_yi: f64,
}

/// Snapshot of a completed least squares fit.
///
/// Sums and means are rounded to 4 decimals, coefficients and correlation to
/// 6. The step rows are not rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Number of observations
    pub n: usize,
    /// Σx
    pub sum_x: f64,
    /// Σy
    pub sum_y: f64,
    /// Σx²
    pub sum_x_squared: f64,
    /// Σy²
    pub sum_y_squared: f64,
    /// Σxy
    pub sum_xy: f64,
    /// x̄
    pub mean_x: f64,
    /// ȳ
    pub mean_y: f64,
    /// Slope
    pub b1: f64,
    /// Intercept
    pub b0: f64,
    /// Pearson correlation coefficient
    pub r: f64,
    /// Coefficient of determination
    pub r_squared: f64,
    /// Per-observation products
    pub steps: Vec<CalculationStep>,
    /// Fitted equation, e.g. `ŷ = 0.8x + 1.5`
    pub equation: String,
}

/// End points of the fitted line over the observed x range, padded by
/// [`LINE_PADDING`] of the range on each side.
///
/// Returns `None` for empty input.
pub fn regression_line(points: &[DataPoint], b0: f64, b1: f64) -> Option<[CurvePoint; 2]> {
    let (min_x, max_x) = crate::x_range(points.iter().map(|p| p.x))?;
    let padding = (max_x - min_x) * LINE_PADDING;
    let (from, to) = (min_x - padding, max_x + padding);
    Some([
        CurvePoint::new(from, predict_y(from, b0, b1)),
        CurvePoint::new(to, predict_y(to, b0, b1)),
    ])
}
