//! Verbal scale for the Pearson correlation coefficient.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Strength of a linear relationship, from `|r|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CorrelationStrength {
    /// `r = 0`
    None,
    /// `0 < |r| < 0.3`
    VeryWeak,
    /// `0.3 ≤ |r| < 0.5`
    Weak,
    /// `0.5 ≤ |r| < 0.7`
    Moderate,
    /// `0.7 ≤ |r| < 0.9`
    Strong,
    /// `0.9 ≤ |r| < 1`
    VeryStrong,
    /// `|r| = 1`
    Perfect,
}

/// Sign of the relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Positive,
    Negative,
}

/// Ordinal reading of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CorrelationInterpretation {
    pub strength: CorrelationStrength,
    pub direction: Direction,
}

/// Map `r` onto the ordinal correlation scale.
///
/// The direction is positive for `r >= 0`.
pub fn interpret_correlation(r: f64) -> CorrelationInterpretation {
    let abs_r = r.abs();
    let strength = if abs_r == 1.0 {
        CorrelationStrength::Perfect
    } else if abs_r >= 0.9 {
        CorrelationStrength::VeryStrong
    } else if abs_r >= 0.7 {
        CorrelationStrength::Strong
    } else if abs_r >= 0.5 {
        CorrelationStrength::Moderate
    } else if abs_r >= 0.3 {
        CorrelationStrength::Weak
    } else if abs_r > 0.0 {
        CorrelationStrength::VeryWeak
    } else {
        CorrelationStrength::None
    };
    let direction = if r >= 0.0 {
        Direction::Positive
    } else {
        Direction::Negative
    };
    CorrelationInterpretation {
        strength,
        direction,
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::None => "no",
            Self::VeryWeak => "very weak",
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
            Self::VeryStrong => "very strong",
            Self::Perfect => "perfect",
        };
        f.write_str(label)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => f.write_str("positive"),
            Self::Negative => f.write_str("negative"),
        }
    }
}

impl fmt::Display for CorrelationInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strength {
            CorrelationStrength::None => f.write_str("no linear correlation"),
            strength => write!(f, "{} {} correlation", strength, self.direction),
        }
    }
}
