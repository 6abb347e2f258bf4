//! Binary logistic regression with one predictor.
//!
//! Models `P(y = 1 | x) = σ(b0 + b1·x)` and fits it by batch gradient ascent
//! on the log-likelihood, starting from `b0 = b1 = 0`.
//!
//! # Algorithm
//!
//! Each iteration:
//!
//! ```text
//! pᵢ      = σ(b0 + b1·xᵢ)
//! ∂b0     = Σ(yᵢ − pᵢ)
//! ∂b1     = Σ(yᵢ − pᵢ)·xᵢ
//! b0     += α·∂b0 / n
//! b1     += α·∂b1 / n
//! LL      = Σ[yᵢ·ln pᵢ + (1 − yᵢ)·ln(1 − pᵢ)]     (pᵢ clamped to [1e-10, 1 − 1e-10])
//! ```
//!
//! The fit stops when `|LLₜ − LLₜ₋₁| < tol` or after `max_iter` iterations,
//! in which case the result is still returned with
//! `convergence_reached = false`.
//!
//! # Goodness of fit
//!
//! ```text
//! LL_null     = n₁·ln(p̄) + n₀·ln(1 − p̄),   p̄ = n₁ / n
//! pseudo R²   = 1 − LL / LL_null              (McFadden)
//! odds ratio  = e^b1
//! ```
//!
//! ```ignore
//! use edustat::logistic::{fit_logistic, LabeledPoint, LogisticOptions, BinaryLabel};
//!
//! let points: Vec<LabeledPoint> = (1..=10)
//!     .map(|x| LabeledPoint::new(x as f64, BinaryLabel::from(x >= 5)))
//!     .collect();
//! let result = fit_logistic(&points, &LogisticOptions::default())?;
//! println!("{}", result.equation);
//! ```

mod interpret;
mod metrics;
mod optimizer;
mod trace;

pub use interpret::{ModelFit, OddsEffect, interpret_odds_ratio, interpret_pseudo_r_squared};
pub use metrics::{
    CURVE_PADDING, ClassificationMetrics, ConfusionMatrix, DEFAULT_THRESHOLD, SIGMOID_SATURATION,
    calculate_accuracy, calculate_confusion_matrix, predict_class, predict_probability,
    probability_curve, sigmoid,
};
pub use optimizer::{
    GradientAscentRun, IterationRecord, PROBABILITY_CLAMP, gradient_ascent, log_likelihood,
    null_log_likelihood,
};
pub use trace::{TraceSampling, sample_trace};

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decimal::{COEFFICIENT_DECIMALS, EQUATION_DECIMALS, format_rounded, round_half_up};
use crate::error::{EngineError, EngineResult};

/// A binary outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum BinaryLabel {
    /// `y = 0`
    Negative,
    /// `y = 1`
    Positive,
}

impl BinaryLabel {
    /// The label as a number, `0.0` or `1.0`.
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Self::Negative => 0.0,
            Self::Positive => 1.0,
        }
    }
}

impl From<bool> for BinaryLabel {
    fn from(positive: bool) -> Self {
        if positive {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

impl From<BinaryLabel> for u8 {
    fn from(label: BinaryLabel) -> Self {
        match label {
            BinaryLabel::Negative => 0,
            BinaryLabel::Positive => 1,
        }
    }
}

impl TryFrom<u8> for BinaryLabel {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Negative),
            1 => Ok(Self::Positive),
            other => Err(EngineError::InvalidLabel {
                value: f64::from(other),
            }),
        }
    }
}

impl TryFrom<f64> for BinaryLabel {
    type Error = EngineError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value == 0.0 {
            Ok(Self::Negative)
        } else if value == 1.0 {
            Ok(Self::Positive)
        } else {
            Err(EngineError::InvalidLabel { value })
        }
    }
}

impl fmt::Display for BinaryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// An observation with a binary outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub x: f64,
    pub y: BinaryLabel,
}

impl LabeledPoint {
    pub fn new(x: f64, y: BinaryLabel) -> Self {
        Self { x, y }
    }

    /// Build a point from a numeric label, which must be `0` or `1`.
    pub fn try_new(x: f64, y: f64) -> EngineResult<Self> {
        Ok(Self {
            x,
            y: BinaryLabel::try_from(y)?,
        })
    }
}

/// Options for [`fit_logistic`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticOptions {
    /// Step size α of the coefficient update
    pub learning_rate: f64,
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Convergence threshold on the change of log-likelihood
    pub tol: f64,
    /// Which iterations are kept in the result's trace
    pub sampling: TraceSampling,
}

impl Default for LogisticOptions {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iter: 1000,
            tol: 1e-6,
            sampling: TraceSampling::default(),
        }
    }
}

impl LogisticOptions {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_sampling(mut self, sampling: TraceSampling) -> Self {
        self.sampling = sampling;
        self
    }

    pub(crate) fn validate(&self) -> EngineResult<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(EngineError::invalid_parameter(
                "learning_rate",
                self.learning_rate,
                "must be finite and positive",
            ));
        }
        if self.max_iter == 0 {
            return Err(EngineError::invalid_parameter(
                "max_iter",
                0.0,
                "at least one iteration is required",
            ));
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return Err(EngineError::invalid_parameter(
                "tol",
                self.tol,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// One sampled optimizer iteration, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticCalculationStep {
    /// 1-based iteration number
    pub iteration: usize,
    pub b0: f64,
    pub b1: f64,
    pub log_likelihood: f64,
    /// `P(y = 1)` for every observation, at the start of the iteration
    pub predictions: Vec<f64>,
}

/// Snapshot of a completed logistic fit.
///
/// Coefficients and fit statistics are rounded to 6 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionResult {
    pub n: usize,
    pub n_positive: usize,
    pub n_negative: usize,
    /// Intercept
    pub b0: f64,
    /// Coefficient of x
    pub b1: f64,
    pub log_likelihood: f64,
    /// Log-likelihood of the intercept-only model
    pub null_log_likelihood: f64,
    /// McFadden's pseudo R²
    pub pseudo_r_squared: f64,
    /// `e^b1`
    pub odds_ratio: f64,
    /// Sampled training trace
    pub iterations: Vec<LogisticCalculationStep>,
    pub convergence_reached: bool,
    /// Fitted model, e.g. `P(Y=1) = 1 / (1 + e^-(-4.2 + 0.9x))`
    pub equation: String,
}

/// Fit a logistic regression by batch gradient ascent.
///
/// # Errors
/// * `InvalidParameter` if the options are out of range
/// * `InsufficientData` if fewer than two points are given
/// * `NonFinite` if an x value is NaN or infinite
/// * `SingleClass` if every point has the same label
pub fn fit_logistic(
    points: &[LabeledPoint],
    options: &LogisticOptions,
) -> EngineResult<LogisticRegressionResult> {
    options.validate()?;

    let n = points.len();
    if n < 2 {
        return Err(EngineError::insufficient(2, n, "fit_logistic"));
    }
    if let Some(index) = points.iter().position(|p| !p.x.is_finite()) {
        return Err(EngineError::NonFinite {
            index,
            context: "fit_logistic".to_string(),
        });
    }

    let n_positive = points
        .iter()
        .filter(|p| p.y == BinaryLabel::Positive)
        .count();
    let n_negative = n - n_positive;
    if n_positive == 0 || n_negative == 0 {
        return Err(EngineError::SingleClass {
            label: u8::from(points[0].y),
        });
    }

    let run = gradient_ascent(points, options)?;
    if !run.converged {
        warn!(
            max_iter = options.max_iter,
            log_likelihood = run.log_likelihood,
            "logistic regression did not converge"
        );
    }

    let null_ll = null_log_likelihood(n, n_positive);
    let pseudo_r_squared = 1.0 - run.log_likelihood / null_ll;
    let odds_ratio = run.b1.exp();

    let result = LogisticRegressionResult {
        n,
        n_positive,
        n_negative,
        b0: round_half_up(run.b0, COEFFICIENT_DECIMALS),
        b1: round_half_up(run.b1, COEFFICIENT_DECIMALS),
        log_likelihood: round_half_up(run.log_likelihood, COEFFICIENT_DECIMALS),
        null_log_likelihood: round_half_up(null_ll, COEFFICIENT_DECIMALS),
        pseudo_r_squared: round_half_up(pseudo_r_squared, COEFFICIENT_DECIMALS),
        odds_ratio: round_half_up(odds_ratio, COEFFICIENT_DECIMALS),
        iterations: sample_trace(&run.iterations, &options.sampling),
        convergence_reached: run.converged,
        equation: equation(run.b0, run.b1),
    };

    debug!(
        n,
        iterations = run.iterations.len(),
        b0 = result.b0,
        b1 = result.b1,
        pseudo_r_squared = result.pseudo_r_squared,
        converged = run.converged,
        "fitted logistic regression"
    );
    Ok(result)
}

fn equation(b0: f64, b1: f64) -> String {
    let sign = if round_half_up(b1, EQUATION_DECIMALS) >= 0.0 {
        '+'
    } else {
        '-'
    };
    format!(
        "P(Y=1) = 1 / (1 + e^-({} {} {}x))",
        format_rounded(b0, EQUATION_DECIMALS),
        sign,
        format_rounded(b1.abs(), EQUATION_DECIMALS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> Vec<LabeledPoint> {
        (1..=10)
            .map(|x| LabeledPoint::new(x as f64, BinaryLabel::from(x >= 5)))
            .collect()
    }

    fn overlapping() -> Vec<LabeledPoint> {
        [(1.0, 0), (2.0, 0), (3.0, 1), (4.0, 0), (5.0, 1), (6.0, 0), (7.0, 1), (8.0, 1)]
            .iter()
            .map(|&(x, y)| LabeledPoint::new(x, BinaryLabel::try_from(y as u8).unwrap()))
            .collect()
    }

    #[test]
    fn test_labels() {
        assert_eq!(BinaryLabel::try_from(1u8).unwrap(), BinaryLabel::Positive);
        assert_eq!(BinaryLabel::try_from(0.0).unwrap(), BinaryLabel::Negative);
        assert_eq!(
            BinaryLabel::try_from(2u8),
            Err(EngineError::InvalidLabel { value: 2.0 })
        );
        assert!(LabeledPoint::try_new(1.0, 0.5).is_err());
        assert_eq!(BinaryLabel::Positive.to_string(), "1");
    }

    #[test]
    fn test_separable_fit() {
        let points = separable();
        let result = fit_logistic(&points, &LogisticOptions::default()).unwrap();

        assert_eq!(result.n, 10);
        assert_eq!(result.n_positive, 6);
        assert_eq!(result.n_negative, 4);
        assert!(result.b1 > 0.5);
        assert!(result.b0 < 0.0);
        assert!(result.log_likelihood > result.null_log_likelihood);
        assert!(result.pseudo_r_squared > 0.4);
        assert!(result.odds_ratio > 1.0);

        // the 0.5 crossing -b0/b1 sits between the classes
        let boundary = -result.b0 / result.b1;
        assert!(boundary > 2.5 && boundary < 6.5, "boundary = {boundary}");
        assert!(predict_probability(1.0, result.b0, result.b1) < 0.5);
        assert!(predict_probability(10.0, result.b0, result.b1) > 0.5);
    }

    #[test]
    fn test_trace_is_sampled() {
        let options = LogisticOptions::default().with_tolerance(0.0).with_max_iter(350);
        let result = fit_logistic(&overlapping(), &options).unwrap();

        assert!(!result.convergence_reached);
        let numbers: Vec<usize> = result.iterations.iter().map(|s| s.iteration).collect();
        assert_eq!(
            numbers,
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 101, 201, 301, 350]
        );
        assert_eq!(result.iterations[0].predictions, vec![0.5; 8]);
    }

    #[test]
    fn test_convergence_flag() {
        let options = LogisticOptions::default().with_max_iter(100_000);
        let result = fit_logistic(&overlapping(), &options).unwrap();
        assert!(result.convergence_reached);
        let last = result.iterations.last().unwrap();
        assert_eq!(last.b0, result.b0);
        assert_eq!(last.b1, result.b1);
    }

    #[test]
    fn test_pseudo_r_squared_formula() {
        let result = fit_logistic(&overlapping(), &LogisticOptions::default()).unwrap();
        let expected = 1.0 - result.log_likelihood / result.null_log_likelihood;
        assert!((result.pseudo_r_squared - expected).abs() < 1e-5);
        assert!((result.null_log_likelihood - 8.0 * 0.5f64.ln()).abs() < 1e-6);
        assert!((result.odds_ratio - result.b1.exp()).abs() < 1e-5);
    }

    #[test]
    fn test_equation_format() {
        assert_eq!(equation(-4.25, 0.9), "P(Y=1) = 1 / (1 + e^-(-4.25 + 0.9x))");
        assert_eq!(equation(1.0, -0.123456), "P(Y=1) = 1 / (1 + e^-(1 - 0.1235x))");
    }

    #[test]
    fn test_failures() {
        let single: Vec<LabeledPoint> = (0..5)
            .map(|x| LabeledPoint::new(x as f64, BinaryLabel::Positive))
            .collect();
        assert_eq!(
            fit_logistic(&single, &LogisticOptions::default()),
            Err(EngineError::SingleClass { label: 1 })
        );

        assert!(matches!(
            fit_logistic(&single[..1], &LogisticOptions::default()),
            Err(EngineError::InsufficientData { .. })
        ));

        let bad = LogisticOptions::default().with_learning_rate(0.0);
        assert!(matches!(
            fit_logistic(&separable(), &bad),
            Err(EngineError::InvalidParameter { .. })
        ));
        assert!(
            fit_logistic(&separable(), &LogisticOptions::default().with_max_iter(0)).is_err()
        );
        assert!(
            fit_logistic(&separable(), &LogisticOptions::default().with_tolerance(f64::NAN))
                .is_err()
        );

        let mut points = separable();
        points[3].x = f64::INFINITY;
        assert!(matches!(
            fit_logistic(&points, &LogisticOptions::default()),
            Err(EngineError::NonFinite { index: 3, .. })
        ));
    }

    #[test]
    fn test_label_serializes_as_number() {
        let json = serde_json::to_string(&LabeledPoint::new(2.5, BinaryLabel::Positive)).unwrap();
        assert_eq!(json, r#"{"x":2.5,"y":1}"#);
        assert!(serde_json::from_str::<LabeledPoint>(r#"{"x":1.0,"y":3}"#).is_err());
    }
}
