//! Error types for the eligibility engine.

use compass_core::error::CompassError;
use thiserror::Error;

/// Errors from rule evaluation.
///
/// Invalid input is a typed error, never a "zero eligibility" result.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("household size must be at least 1")]
    InvalidHouseholdSize,
    #[error("annual income cannot be negative: {0}")]
    NegativeIncome(f64),
    #[error("no reference tables available for year {0}")]
    UnknownYear(u16),
}

impl From<EngineError> for CompassError {
    fn from(err: EngineError) -> Self {
        CompassError::Engine(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        assert_eq!(
            EngineError::MissingField("annual_income").to_string(),
            "missing required field: annual_income"
        );
        assert_eq!(
            EngineError::InvalidHouseholdSize.to_string(),
            "household size must be at least 1"
        );
        assert_eq!(
            EngineError::NegativeIncome(-5.0).to_string(),
            "annual income cannot be negative: -5"
        );
        assert_eq!(
            EngineError::UnknownYear(2019).to_string(),
            "no reference tables available for year 2019"
        );
    }

    #[test]
    fn test_engine_error_into_compass_error() {
        let err: CompassError = EngineError::InvalidHouseholdSize.into();
        assert!(matches!(err, CompassError::Engine(_)));
        assert!(err.to_string().contains("household size"));
    }
}
