//! Conversion request and result types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use xrate_common::{CurrencyCode, CurrencyPair, Rate, ValidationError};

use crate::error::FxResult;

/// Outcome of resolving one conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "ConversionResponse")]
pub struct ConversionResult {
    pair: CurrencyPair,
    from_amount: Decimal,
    to_amount: Decimal,
    rate: Rate,
    converted_at: DateTime<Utc>,
    path: Option<String>,
}

impl ConversionResult {
    /// Result of a single-hop (direct or inverted) conversion.
    pub fn direct(pair: CurrencyPair, from_amount: Decimal, to_amount: Decimal, rate: Rate) -> Self {
        Self {
            pair,
            from_amount,
            to_amount,
            rate,
            converted_at: Utc::now(),
            path: None,
        }
    }

    /// Result of a conversion chained through an intermediate currency.
    pub fn chained(
        pair: CurrencyPair,
        from_amount: Decimal,
        to_amount: Decimal,
        rate: Rate,
        path: String,
    ) -> Self {
        Self {
            path: Some(path),
            ..Self::direct(pair, from_amount, to_amount, rate)
        }
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn from_amount(&self) -> Decimal {
        self.from_amount
    }

    /// Converted amount at the target currency's display precision.
    pub fn to_amount(&self) -> Decimal {
        self.to_amount
    }

    /// Effective rate at working precision.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    pub fn converted_at(&self) -> DateTime<Utc> {
        self.converted_at
    }

    /// Chain descriptor such as `EUR→USD→JPY`; `None` for single-hop.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn is_direct_conversion(&self) -> bool {
        self.path.is_none()
    }

    pub fn is_chain_conversion(&self) -> bool {
        self.path.is_some()
    }
}

/// Wire shape of a [`ConversionResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResponse {
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    pub rate: Decimal,
    pub converted_at: DateTime<Utc>,
    pub conversion_path: Option<String>,
}

impl From<ConversionResult> for ConversionResponse {
    fn from(result: ConversionResult) -> Self {
        Self {
            from_currency: result.pair.from().clone(),
            to_currency: result.pair.to().clone(),
            from_amount: result.from_amount,
            to_amount: result.to_amount,
            rate: result.rate.value(),
            converted_at: result.converted_at,
            conversion_path: result.path,
        }
    }
}

/// Unvalidated conversion input as supplied by an outer layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversionRequest {
    pub from_currency: String,
    pub to_currency: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl ConversionRequest {
    /// Create a new conversion request.
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Decimal) -> Self {
        Self {
            from_currency: from.into(),
            to_currency: to.into(),
            amount: Some(amount),
        }
    }

    /// Validate codes and amount into typed values.
    pub fn validate(&self) -> FxResult<(CurrencyCode, CurrencyCode, Decimal)> {
        let from = CurrencyCode::of(&self.from_currency)?;
        let to = CurrencyCode::of(&self.to_currency)?;
        let amount = self
            .amount
            .ok_or_else(|| ValidationError::InvalidAmount("<missing>".to_string()))?;
        Ok((from, to, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use rust_decimal_macros::dec;

    fn usd_eur() -> CurrencyPair {
        CurrencyPair::parse("USD", "EUR").unwrap()
    }

    #[test]
    fn test_direct_result() {
        let result = ConversionResult::direct(
            usd_eur(),
            dec!(100),
            dec!(85.00),
            Rate::of(dec!(0.85)).unwrap(),
        );

        assert!(result.is_direct_conversion());
        assert!(!result.is_chain_conversion());
        assert_eq!(result.path(), None);
        assert_eq!(result.to_amount(), dec!(85.00));
    }

    #[test]
    fn test_chained_result_serializes_path() {
        let pair = CurrencyPair::parse("EUR", "JPY").unwrap();
        let result = ConversionResult::chained(
            pair,
            dec!(100),
            dec!(12980),
            Rate::of(dec!(129.8)).unwrap(),
            "EUR→USD→JPY".to_string(),
        );

        assert!(result.is_chain_conversion());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["from_currency"], "EUR");
        assert_eq!(json["to_currency"], "JPY");
        assert_eq!(json["to_amount"], "12980");
        assert_eq!(json["rate"], "129.8");
        assert_eq!(json["conversion_path"], "EUR→USD→JPY");
    }

    #[test]
    fn test_request_validation() {
        let request = ConversionRequest::new(" usd", "eur ", dec!(100));
        let (from, to, amount) = request.validate().unwrap();
        assert_eq!(from, CurrencyCode::usd());
        assert_eq!(to, CurrencyCode::eur());
        assert_eq!(amount, dec!(100));

        let request: ConversionRequest =
            serde_json::from_str(r#"{"from_currency":"USD","to_currency":"EUR"}"#).unwrap();
        assert!(matches!(
            request.validate(),
            Err(FxError::Validation(ValidationError::InvalidAmount(_)))
        ));

        let request = ConversionRequest::new("US", "EUR", dec!(1));
        assert!(matches!(
            request.validate(),
            Err(FxError::Validation(ValidationError::InvalidCurrencyCode(_)))
        ));
    }
}
