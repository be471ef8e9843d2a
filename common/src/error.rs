//! Validation errors raised while constructing xrate value types.

use thiserror::Error;

use crate::CurrencyCode;

/// Errors produced when raw input cannot form a valid value type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Currency code is empty or not exactly three characters.
    #[error("Invalid currency code {0:?}: must be exactly 3 characters")]
    InvalidCurrencyCode(String),

    /// Rate is missing, zero or negative.
    #[error("Invalid rate {0}: must be greater than zero")]
    InvalidRate(String),

    /// Source and target currency are identical.
    #[error("Source and target currency cannot be the same: {0}")]
    SameCurrency(CurrencyCode),

    /// Amount is missing, zero or negative.
    #[error("Invalid amount {0}: must be greater than zero")]
    InvalidAmount(String),
}

impl ValidationError {
    /// Get error code for rendering to callers.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidCurrencyCode(_) => "INVALID_CURRENCY_CODE",
            ValidationError::InvalidRate(_) => "INVALID_RATE",
            ValidationError::SameCurrency(_) => "SAME_CURRENCY",
            ValidationError::InvalidAmount(_) => "INVALID_AMOUNT",
        }
    }
}

/// Result type alias for value type construction.
pub type Result<T> = std::result::Result<T, ValidationError>;
