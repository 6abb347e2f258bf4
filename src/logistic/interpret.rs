//! Verbal readings of logistic fit statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Quality of fit on McFadden's pseudo R² scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelFit {
    /// `R² < 0.1`
    Poor,
    /// `0.1 ≤ R² < 0.2`
    Moderate,
    /// `0.2 ≤ R² < 0.4`
    Good,
    /// `R² ≥ 0.4`
    Excellent,
}

/// Effect of a unit increase in x on the odds of `y = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OddsEffect {
    Increase { percent: f64 },
    Decrease { percent: f64 },
    NoEffect,
}

pub fn interpret_pseudo_r_squared(r_squared: f64) -> ModelFit {
    if r_squared >= 0.4 {
        ModelFit::Excellent
    } else if r_squared >= 0.2 {
        ModelFit::Good
    } else if r_squared >= 0.1 {
        ModelFit::Moderate
    } else {
        ModelFit::Poor
    }
}

/// Read an odds ratio `e^b1` as a percent change in the odds.
pub fn interpret_odds_ratio(odds_ratio: f64) -> OddsEffect {
    if odds_ratio > 1.0 {
        OddsEffect::Increase {
            percent: (odds_ratio - 1.0) * 100.0,
        }
    } else if odds_ratio < 1.0 {
        OddsEffect::Decrease {
            percent: (1.0 - odds_ratio) * 100.0,
        }
    } else {
        OddsEffect::NoEffect
    }
}

impl fmt::Display for ModelFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Moderate => "moderate",
            Self::Poor => "poor",
        };
        write!(f, "{label} fit")
    }
}

impl fmt::Display for OddsEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increase { percent } => write!(
                f,
                "odds of y=1 increase by {percent:.1}% per unit increase in x"
            ),
            Self::Decrease { percent } => write!(
                f,
                "odds of y=1 decrease by {percent:.1}% per unit increase in x"
            ),
            Self::NoEffect => f.write_str("x has no effect on the odds of y=1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_model_fit_thresholds() {
        assert_eq!(interpret_pseudo_r_squared(0.8), ModelFit::Excellent);
        assert_eq!(interpret_pseudo_r_squared(0.4), ModelFit::Excellent);
        assert_eq!(interpret_pseudo_r_squared(0.39), ModelFit::Good);
        assert_eq!(interpret_pseudo_r_squared(0.2), ModelFit::Good);
        assert_eq!(interpret_pseudo_r_squared(0.1), ModelFit::Moderate);
        assert_eq!(interpret_pseudo_r_squared(0.05), ModelFit::Poor);
        assert_eq!(ModelFit::Good.to_string(), "good fit");
    }

    #[test]
    fn test_odds_ratio() {
        let effect = interpret_odds_ratio(1.0f64.exp());
        match effect {
            OddsEffect::Increase { percent } => {
                assert_relative_eq!(percent, 171.828, epsilon = 1e-3)
            }
            other => panic!("expected an increase, got {other:?}"),
        }
        assert_eq!(
            effect.to_string(),
            "odds of y=1 increase by 171.8% per unit increase in x"
        );

        assert_eq!(
            interpret_odds_ratio(0.75).to_string(),
            "odds of y=1 decrease by 25.0% per unit increase in x"
        );
        assert_eq!(interpret_odds_ratio(1.0), OddsEffect::NoEffect);
    }
}
