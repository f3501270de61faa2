// Custom error type for the valuation engine
// Validation is the only failure path; every computation stage is total
// over validated input.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PredictionError {
    /// The input failed validation before any computation ran. Carries the
    /// offending field name and a human-readable reason.
    #[error("invalid input: {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl PredictionError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PredictionError::InvalidInput { field, reason: reason.into() }
    }

    /// Name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            PredictionError::InvalidInput { field, .. } => field,
        }
    }
}

// Define a custom Result type using our PredictionError
pub type EngineResult<T> = Result<T, PredictionError>;
