//! Monetary value types for xrate.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ValidationError};

/// Fractional digits used for intermediate rate algebra.
pub const WORKING_SCALE: u32 = 6;

/// Rounding applied wherever xrate rounds (half-up for positive values).
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Round a value to the working scale.
pub fn round_working(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(WORKING_SCALE, ROUNDING)
}

/// ISO 4217 style currency code, normalized to three upper-case characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a currency code, trimming and upper-casing the input.
    pub fn of(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_uppercase();
        if normalized.chars().count() != 3 {
            return Err(ValidationError::InvalidCurrencyCode(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Get the currency code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    pub fn eur() -> Self {
        Self("EUR".to_string())
    }

    pub fn gbp() -> Self {
        Self("GBP".to_string())
    }

    pub fn jpy() -> Self {
        Self("JPY".to_string())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::of(s)
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(s: &str) -> Result<Self> {
        Self::of(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self> {
        Self::of(&s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// A strictly positive exchange rate multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rate(Decimal);

impl Rate {
    /// Create a rate, rejecting zero and negative values.
    pub fn of(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::InvalidRate(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Create a rate from a value that may be absent.
    pub fn of_optional(value: Option<Decimal>) -> Result<Self> {
        match value {
            Some(value) => Self::of(value),
            None => Err(ValidationError::InvalidRate("<missing>".to_string())),
        }
    }

    /// Create a rate from an intermediate result, rounded to the working scale.
    ///
    /// Values too small to survive rounding keep their full precision so the
    /// rate stays strictly positive.
    pub fn at_working_scale(value: Decimal) -> Result<Self> {
        Self::of(working_or_exact(value))
    }

    /// Get the rate value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Get `1 / value` at the working scale.
    pub fn inverse(&self) -> Rate {
        Rate(working_or_exact(Decimal::ONE / self.0))
    }
}

/// Working-scale value, or `value` itself when rounding would erase it.
fn working_or_exact(value: Decimal) -> Decimal {
    let rounded = round_working(value);
    if rounded.is_zero() {
        value
    } else {
        rounded
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Rate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim())
            .map_err(|_| ValidationError::InvalidRate(s.to_string()))?;
        Self::of(value)
    }
}

impl TryFrom<Decimal> for Rate {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::of(value)
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

/// An ordered pair of distinct currencies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawCurrencyPair")]
pub struct CurrencyPair {
    from: CurrencyCode,
    to: CurrencyCode,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn of(from: CurrencyCode, to: CurrencyCode) -> Result<Self> {
        if from == to {
            return Err(ValidationError::SameCurrency(from));
        }
        Ok(Self { from, to })
    }

    /// Create a pair from raw codes, validating both.
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Self::of(CurrencyCode::of(from)?, CurrencyCode::of(to)?)
    }

    /// Source currency.
    pub fn from(&self) -> &CurrencyCode {
        &self.from
    }

    /// Target currency.
    pub fn to(&self) -> &CurrencyCode {
        &self.to
    }

    /// Get the reversed pair.
    pub fn reverse(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    /// Whether either side of the pair is `code`.
    pub fn involves(&self, code: &CurrencyCode) -> bool {
        &self.from == code || &self.to == code
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)
    }
}

#[derive(Deserialize)]
struct RawCurrencyPair {
    from: CurrencyCode,
    to: CurrencyCode,
}

impl TryFrom<RawCurrencyPair> for CurrencyPair {
    type Error = ValidationError;

    fn try_from(raw: RawCurrencyPair) -> Result<Self> {
        Self::of(raw.from, raw.to)
    }
}
