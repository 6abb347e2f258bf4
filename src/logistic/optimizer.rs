//! Batch gradient ascent on the log-likelihood.
//!
//! The optimizer records every iteration; choosing which ones to show is left
//! to [`super::sample_trace`].

use tracing::trace;

use super::{BinaryLabel, LabeledPoint, LogisticOptions, sigmoid};
use crate::decimal;
use crate::error::{EngineError, EngineResult};

/// Probabilities are kept inside `[PROBABILITY_CLAMP, 1 − PROBABILITY_CLAMP]`
/// before taking logarithms.
pub const PROBABILITY_CLAMP: f64 = 1e-10;

/// State after one iteration of gradient ascent.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    /// 1-based iteration number
    pub iteration: usize,
    /// Intercept after the update
    pub b0: f64,
    /// Slope after the update
    pub b1: f64,
    /// Log-likelihood at the updated coefficients
    pub log_likelihood: f64,
    /// `P(y = 1)` per observation before the update
    pub predictions: Vec<f64>,
}

/// Outcome of [`gradient_ascent`].
#[derive(Debug, Clone, PartialEq)]
pub struct GradientAscentRun {
    pub b0: f64,
    pub b1: f64,
    /// Log-likelihood at the final coefficients
    pub log_likelihood: f64,
    /// Every iteration, in order
    pub iterations: Vec<IterationRecord>,
    /// Whether the log-likelihood change fell below `tol`
    pub converged: bool,
}

/// Maximize the log-likelihood of `σ(b0 + b1·x)` from `b0 = b1 = 0`.
///
/// # Arguments
/// * `points` - Observations; both labels need not be present
/// * `options` - Learning rate, iteration limit and tolerance
///
/// # Errors
/// * `InvalidParameter` if the options are out of range
/// * `InsufficientData` if `points` is empty
///
/// # Note
/// Reaching `max_iter` is not an error: the run is returned with
/// `converged = false`.
pub fn gradient_ascent(
    points: &[LabeledPoint],
    options: &LogisticOptions,
) -> EngineResult<GradientAscentRun> {
    options.validate()?;
    if points.is_empty() {
        return Err(EngineError::insufficient(1, 0, "gradient_ascent"));
    }

    let n = points.len() as f64;
    let mut b0 = 0.0;
    let mut b1 = 0.0;
    let mut ll = log_likelihood(points, b0, b1);
    let mut previous = f64::NEG_INFINITY;
    let mut iterations = Vec::new();
    let mut converged = false;

    for iter in 0..options.max_iter {
        let mut grad_b0 = 0.0;
        let mut grad_b1 = 0.0;
        let mut predictions = Vec::with_capacity(points.len());

        for point in points {
            let p = sigmoid(b0 + b1 * point.x);
            let error = point.y.value() - p;
            grad_b0 += error;
            grad_b1 += error * point.x;
            predictions.push(p);
        }

        // Batch update; coefficients accumulate in decimal arithmetic
        b0 = decimal::add(b0, options.learning_rate * grad_b0 / n);
        b1 = decimal::add(b1, options.learning_rate * grad_b1 / n);

        ll = log_likelihood(points, b0, b1);
        trace!(iteration = iter + 1, b0, b1, log_likelihood = ll, "gradient ascent step");

        iterations.push(IterationRecord {
            iteration: iter + 1,
            b0,
            b1,
            log_likelihood: ll,
            predictions,
        });

        if (ll - previous).abs() < options.tol {
            converged = true;
            break;
        }
        previous = ll;
    }

    Ok(GradientAscentRun {
        b0,
        b1,
        log_likelihood: ll,
        iterations,
        converged,
    })
}

/// Log-likelihood of the observations under `σ(b0 + b1·x)`.
pub fn log_likelihood(points: &[LabeledPoint], b0: f64, b1: f64) -> f64 {
    points
        .iter()
        .map(|point| {
            let p = clamp_probability(sigmoid(b0 + b1 * point.x));
            match point.y {
                BinaryLabel::Positive => p.ln(),
                BinaryLabel::Negative => (1.0 - p).ln(),
            }
        })
        .sum()
}

/// Log-likelihood of the intercept-only model, which predicts the empirical
/// positive rate `n_positive / n` for every observation.
pub fn null_log_likelihood(n: usize, n_positive: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = clamp_probability(n_positive as f64 / n as f64);
    let n_negative = n - n_positive.min(n);
    n_positive as f64 * p.ln() + n_negative as f64 * (1.0 - p).ln()
}

#[inline]
fn clamp_probability(p: f64) -> f64 {
    p.clamp(PROBABILITY_CLAMP, 1.0 - PROBABILITY_CLAMP)
}
