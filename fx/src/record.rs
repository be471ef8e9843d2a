//! Stored exchange rate records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xrate_common::{CurrencyPair, Rate};

/// Source recorded when a rate is stored without one.
pub const DEFAULT_SOURCE: &str = "Manual";

/// The latest known rate for a currency pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Unique record ID.
    pub id: Uuid,
    /// The currency pair this rate converts.
    pub pair: CurrencyPair,
    /// Multiplier from `pair.from()` to `pair.to()`.
    pub rate: Rate,
    /// Where the rate came from.
    pub source: String,
    /// When the rate or source last changed.
    pub updated_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Create a new record stamped with the current time.
    pub fn new(pair: CurrencyPair, rate: Rate, source: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            pair,
            rate,
            source: source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            updated_at: Utc::now(),
        }
    }

    /// Replace the rate.
    pub fn update_rate(&mut self, rate: Rate) {
        self.rate = rate;
        self.updated_at = Utc::now();
    }

    /// Replace the source; `None` leaves it unchanged.
    pub fn update_source(&mut self, source: Option<String>) {
        if let Some(source) = source {
            self.source = source;
            self.updated_at = Utc::now();
        }
    }

    /// Check if the record was updated within `within`.
    pub fn is_current(&self, within: Duration) -> bool {
        Utc::now().signed_duration_since(self.updated_at) < within
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd_eur() -> CurrencyPair {
        CurrencyPair::parse("USD", "EUR").unwrap()
    }

    #[test]
    fn test_default_source() {
        let record = ExchangeRate::new(usd_eur(), Rate::of(dec!(0.92)).unwrap(), None);
        assert_eq!(record.source, DEFAULT_SOURCE);
        assert!(record.is_current(Duration::seconds(60)));
    }

    #[test]
    fn test_update_keeps_id() {
        let mut record = ExchangeRate::new(
            usd_eur(),
            Rate::of(dec!(0.92)).unwrap(),
            Some("Central Bank".to_string()),
        );
        let id = record.id;
        let before = record.updated_at;

        record.update_rate(Rate::of(dec!(0.93)).unwrap());
        record.update_source(None);

        assert_eq!(record.id, id);
        assert_eq!(record.rate.value(), dec!(0.93));
        assert_eq!(record.source, "Central Bank");
        assert!(record.updated_at >= before);
    }

    #[test]
    fn test_stale_record() {
        let mut record = ExchangeRate::new(usd_eur(), Rate::of(dec!(0.92)).unwrap(), None);
        record.updated_at = Utc::now() - Duration::hours(2);

        assert!(!record.is_current(Duration::hours(1)));
    }
}
