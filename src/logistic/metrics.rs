//! Prediction and classification metrics for a fitted logistic model.
//!
//! Everything here is a pure re-derivation from `(b0, b1)` and a threshold,
//! so metrics can be recomputed for any threshold without refitting.

use serde::{Deserialize, Serialize};

use super::{BinaryLabel, LabeledPoint};
use crate::CurvePoint;
use crate::decimal::{PROBABILITY_DECIMALS, mul_add, round_half_up};

/// Default classification threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// `|z|` beyond which the sigmoid is taken as exactly 0 or 1.
pub const SIGMOID_SATURATION: f64 = 500.0;

/// Share of the x range added on each side of a sampled probability curve.
pub const CURVE_PADDING: f64 = 0.2;

/// Logistic function `1 / (1 + e^-z)`, saturated outside `±500`.
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    if z > SIGMOID_SATURATION {
        1.0
    } else if z < -SIGMOID_SATURATION {
        0.0
    } else {
        1.0 / (1.0 + (-z).exp())
    }
}

/// `P(y = 1 | x) = σ(b0 + b1·x)`, with the linear predictor evaluated in
/// decimal arithmetic.
pub fn predict_probability(x: f64, b0: f64, b1: f64) -> f64 {
    sigmoid(mul_add(b1, x, b0))
}

/// Classify `x`; a probability equal to the threshold is positive.
pub fn predict_class(x: f64, b0: f64, b1: f64, threshold: f64) -> BinaryLabel {
    BinaryLabel::from(predict_probability(x, b0, b1) >= threshold)
}

/// Share of points whose predicted class matches the label; 0 for no points.
pub fn calculate_accuracy(points: &[LabeledPoint], b0: f64, b1: f64, threshold: f64) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let correct = points
        .iter()
        .filter(|p| predict_class(p.x, b0, b1, threshold) == p.y)
        .count();
    correct as f64 / points.len() as f64
}

/// Tally predicted against actual classes.
pub fn calculate_confusion_matrix(
    points: &[LabeledPoint],
    b0: f64,
    b1: f64,
    threshold: f64,
) -> ConfusionMatrix {
    let mut matrix = ConfusionMatrix::default();
    for point in points {
        match (point.y, predict_class(point.x, b0, b1, threshold)) {
            (BinaryLabel::Positive, BinaryLabel::Positive) => matrix.true_positive += 1,
            (BinaryLabel::Negative, BinaryLabel::Negative) => matrix.true_negative += 1,
            (BinaryLabel::Negative, BinaryLabel::Positive) => matrix.false_positive += 1,
            (BinaryLabel::Positive, BinaryLabel::Negative) => matrix.false_negative += 1,
        }
    }
    matrix
}

/// 2×2 tally of predicted against actual classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
}

/// Rates derived from a confusion matrix. A rate whose denominator is zero
/// is reported as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    /// True positive rate (recall)
    pub sensitivity: f64,
    /// True negative rate
    pub specificity: f64,
    /// Positive predictive value
    pub precision: f64,
    pub f1_score: f64,
}

impl ConfusionMatrix {
    /// Number of classified points.
    pub fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    pub fn metrics(&self) -> ClassificationMetrics {
        let precision = rate(self.true_positive, self.true_positive + self.false_positive);
        let sensitivity = rate(self.true_positive, self.true_positive + self.false_negative);
        let f1_score = if precision + sensitivity > 0.0 {
            2.0 * precision * sensitivity / (precision + sensitivity)
        } else {
            0.0
        };
        ClassificationMetrics {
            accuracy: rate(self.true_positive + self.true_negative, self.total()),
            sensitivity,
            specificity: rate(self.true_negative, self.true_negative + self.false_positive),
            precision,
            f1_score,
        }
    }
}

#[inline]
fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Sample `σ(b0 + b1·x)` at `samples + 1` evenly spaced x values spanning
/// the observed range padded by [`CURVE_PADDING`] on each side.
///
/// Coordinates are rounded to 4 decimals. Empty input gives an empty curve.
pub fn probability_curve(
    points: &[LabeledPoint],
    b0: f64,
    b1: f64,
    samples: usize,
) -> Vec<CurvePoint> {
    let Some((min_x, max_x)) = crate::x_range(points.iter().map(|p| p.x)) else {
        return Vec::new();
    };
    let padding = (max_x - min_x) * CURVE_PADDING;
    let from = min_x - padding;
    let span = max_x - min_x + 2.0 * padding;
    let samples = samples.max(1);

    (0..=samples)
        .map(|i| {
            let x = from + (i as f64 / samples as f64) * span;
            CurvePoint::new(
                round_half_up(x, PROBABILITY_DECIMALS),
                round_half_up(predict_probability(x, b0, b1), PROBABILITY_DECIMALS),
            )
        })
        .collect()
}
