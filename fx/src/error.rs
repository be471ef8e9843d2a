//! FX engine error types.

use thiserror::Error;
use xrate_common::{CurrencyPair, ValidationError};

/// Errors that can occur while resolving a conversion.
#[derive(Debug, Error)]
pub enum FxError {
    /// Input failed value type validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No direct, reverse or pivot-chain rate connects the pair.
    #[error("No exchange rate available for {0}")]
    RateNotFound(CurrencyPair),

    /// Decimal arithmetic exceeded the representable range.
    #[error("Arithmetic overflow while converting {0}")]
    ArithmeticOverflow(CurrencyPair),

    /// Engine configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rate seed data could not be read or parsed.
    #[error("Rate seed error: {0}")]
    RateSeed(String),
}

/// Broad classification used by outer layers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Caller supplied bad input (400-class).
    Validation,
    /// No rate path exists (404/422-class).
    NotFound,
    /// Failure not attributable to the request (500-class).
    Internal,
}

impl FxError {
    /// Get error code for protocol messages.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::Validation(e) => e.error_code(),
            FxError::RateNotFound(_) => "RATE_NOT_FOUND",
            FxError::ArithmeticOverflow(_) => "ARITHMETIC_OVERFLOW",
            FxError::Configuration(_) => "CONFIGURATION_ERROR",
            FxError::RateSeed(_) => "RATE_SEED_ERROR",
        }
    }

    /// Classify the error for transport mapping.
    pub fn category(&self) -> ErrorCategory {
        match self {
            FxError::Validation(_) => ErrorCategory::Validation,
            FxError::RateNotFound(_) => ErrorCategory::NotFound,
            FxError::ArithmeticOverflow(_) | FxError::Configuration(_) | FxError::RateSeed(_) => {
                ErrorCategory::Internal
            }
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use xrate_common::CurrencyCode;

    #[test]
    fn test_validation_errors_keep_their_code() {
        let err: FxError = ValidationError::InvalidAmount("0".into()).into();
        assert_eq!(err.error_code(), "INVALID_AMOUNT");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.to_string(), "Invalid amount 0: must be greater than zero");
    }

    #[test]
    fn test_rate_not_found() {
        let pair = CurrencyPair::of(CurrencyCode::eur(), CurrencyCode::jpy()).unwrap();
        let err = FxError::RateNotFound(pair);
        assert_eq!(err.error_code(), "RATE_NOT_FOUND");
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "No exchange rate available for EUR/JPY");
    }
}
