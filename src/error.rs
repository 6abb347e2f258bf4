//! Error types for the statistical engine.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Conditions under which a computation produces no result.
///
/// Every variant is a local, recoverable outcome. A fit either returns a
/// complete result or one of these, never a partially filled structure.
/// Non-convergence of the logistic optimizer is *not* an error: it is
/// reported through `LogisticRegressionResult::convergence_reached`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Fewer observations than the computation needs.
    #[error("insufficient data in {context}: need {required} observations, got {got}")]
    InsufficientData {
        required: usize,
        got: usize,
        context: String,
    },

    /// The independent variable has zero variance, so the slope is undefined.
    #[error("degenerate input in {context}: all x values are identical")]
    DegenerateInput { context: String },

    /// Logistic fit attempted with a single label value present.
    #[error("every observation has label {label}; both classes are required")]
    SingleClass { label: u8 },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: f64,
        reason: String,
    },

    /// A label outside `{0, 1}`.
    #[error("invalid label {value}: must be 0 or 1")]
    InvalidLabel { value: f64 },

    /// Input that must be sorted ascending is not.
    #[error("observations are not sorted ascending at index {index}")]
    Unsorted { index: usize },

    /// NaN or infinite observation.
    #[error("non-finite value at index {index} in {context}")]
    NonFinite { index: usize, context: String },

    /// Decimal overflow or a value that cannot be represented.
    #[error("numerical error: {message}")]
    Numerical { message: String },
}

impl EngineError {
    pub(crate) fn insufficient(required: usize, got: usize, context: &str) -> Self {
        Self::InsufficientData {
            required,
            got,
            context: context.to_string(),
        }
    }

    pub(crate) fn numerical(message: impl Into<String>) -> Self {
        Self::Numerical {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_parameter(name: &str, value: f64, reason: &str) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            value,
            reason: reason.to_string(),
        }
    }
}
