//! Seed data for populating a rate store.

use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use xrate_common::{CurrencyPair, Rate};

use crate::error::{FxError, FxResult};

/// One rate entry as it appears in a seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct RateSeed {
    pub from: String,
    pub to: String,
    pub rate: Decimal,
    #[serde(default)]
    pub source: Option<String>,
}

impl RateSeed {
    /// Validate the entry into a typed pair and rate.
    pub fn validate(&self) -> FxResult<(CurrencyPair, Rate)> {
        let pair = CurrencyPair::parse(&self.from, &self.to)?;
        let rate = Rate::of(self.rate)?;
        Ok((pair, rate))
    }
}

/// Parse a JSON array of rate entries.
pub fn parse_json<R: Read>(reader: R) -> FxResult<Vec<RateSeed>> {
    serde_json::from_reader(reader).map_err(|e| FxError::RateSeed(e.to_string()))
}

/// The initial data set: central bank quotes for the common currencies.
pub fn default_rates() -> Vec<RateSeed> {
    const CENTRAL_BANK: &str = "Central Bank";
    let entries = [
        ("USD", "EUR", Decimal::new(92, 2)),
        ("USD", "GBP", Decimal::new(79, 2)),
        ("USD", "JPY", Decimal::new(14950, 2)),
        ("EUR", "USD", Decimal::new(109, 2)),
        ("EUR", "GBP", Decimal::new(86, 2)),
        ("GBP", "USD", Decimal::new(127, 2)),
        ("USD", "CNY", Decimal::new(724, 2)),
        ("USD", "CHF", Decimal::new(88, 2)),
    ];

    entries
        .into_iter()
        .map(|(from, to, rate)| RateSeed {
            from: from.to_string(),
            to: to.to_string(),
            rate,
            source: Some(CENTRAL_BANK.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use xrate_common::ValidationError;

    #[test]
    fn test_default_rates_are_valid() {
        let seeds = default_rates();
        assert_eq!(seeds.len(), 8);
        for seed in &seeds {
            assert!(seed.validate().is_ok(), "{seed:?}");
        }
    }

    #[test]
    fn test_parse_json() {
        let json = r#"[
            {"from": "eur", "to": "usd", "rate": "1.18"},
            {"from": "USD", "to": "JPY", "rate": 110.0, "source": "ECB"}
        ]"#;

        let seeds = parse_json(json.as_bytes()).unwrap();

        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds[0].rate, dec!(1.18));
        assert_eq!(seeds[0].source, None);
        assert_eq!(seeds[1].source.as_deref(), Some("ECB"));

        let (pair, rate) = seeds[0].validate().unwrap();
        assert_eq!(pair.to_string(), "EUR/USD");
        assert_eq!(rate.value(), dec!(1.18));
    }

    #[test]
    fn test_parse_json_malformed() {
        let result = parse_json("{not json".as_bytes());
        assert!(matches!(result, Err(FxError::RateSeed(_))));
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        let seed = RateSeed {
            from: "USD".into(),
            to: "USD".into(),
            rate: dec!(1),
            source: None,
        };
        assert!(matches!(
            seed.validate(),
            Err(FxError::Validation(ValidationError::SameCurrency(_)))
        ));

        let seed = RateSeed {
            from: "USD".into(),
            to: "EUR".into(),
            rate: dec!(-0.5),
            source: None,
        };
        assert!(matches!(
            seed.validate(),
            Err(FxError::Validation(ValidationError::InvalidRate(_)))
        ));
    }
}
