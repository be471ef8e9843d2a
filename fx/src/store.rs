//! Rate store trait and an in-memory implementation.

use std::io::Read;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;
use xrate_common::{CurrencyCode, CurrencyPair, Rate};

use crate::error::FxResult;
use crate::record::ExchangeRate;
use crate::seed::{self, RateSeed};

/// Source of the most recent rate for an exact ordered pair.
///
/// Implementations know nothing about inversion or chaining; the engine
/// does that on top of this single lookup.
pub trait RateStore: Send + Sync {
    /// Get the latest rate stored for `pair`, if any.
    fn find_latest_rate(&self, pair: &CurrencyPair) -> Option<Rate>;
}

impl<S: RateStore + ?Sized> RateStore for Arc<S> {
    fn find_latest_rate(&self, pair: &CurrencyPair) -> Option<Rate> {
        (**self).find_latest_rate(pair)
    }
}

impl<S: RateStore + ?Sized> RateStore for &S {
    fn find_latest_rate(&self, pair: &CurrencyPair) -> Option<Rate> {
        (**self).find_latest_rate(pair)
    }
}

/// Optional source/target filters for listing stored rates.
#[derive(Debug, Clone, Default)]
pub struct RateFilter {
    pub from: Option<CurrencyCode>,
    pub to: Option<CurrencyCode>,
}

impl RateFilter {
    /// Match every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Only records converting from `code`.
    pub fn from(mut self, code: CurrencyCode) -> Self {
        self.from = Some(code);
        self
    }

    /// Only records converting to `code`.
    pub fn to(mut self, code: CurrencyCode) -> Self {
        self.to = Some(code);
        self
    }

    fn matches(&self, record: &ExchangeRate) -> bool {
        self.from.as_ref().map_or(true, |c| record.pair.from() == c)
            && self.to.as_ref().map_or(true, |c| record.pair.to() == c)
    }
}

/// Thread-safe store keeping the latest record per pair.
pub struct InMemoryRateStore {
    rates: DashMap<CurrencyPair, ExchangeRate>,
}

impl InMemoryRateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            rates: DashMap::new(),
        }
    }

    /// Create a store holding the default data set.
    pub fn with_default_rates() -> FxResult<Self> {
        let store = Self::new();
        store.load(seed::default_rates())?;
        Ok(store)
    }

    /// Insert or update the rate for `pair`.
    ///
    /// An existing record keeps its ID and has its rate, source and
    /// timestamp refreshed.
    pub fn upsert(&self, pair: CurrencyPair, rate: Rate, source: Option<String>) -> ExchangeRate {
        let entry = self
            .rates
            .entry(pair.clone())
            .and_modify(|record| {
                record.update_rate(rate);
                record.update_source(source.clone());
            })
            .or_insert_with(|| ExchangeRate::new(pair.clone(), rate, source));

        debug!(pair = %pair, rate = %entry.rate, "Stored rate");
        entry.value().clone()
    }

    /// Validate and store a batch of seed entries.
    ///
    /// Stops at the first invalid entry; entries before it stay stored.
    pub fn load(&self, seeds: Vec<RateSeed>) -> FxResult<usize> {
        let count = seeds.len();
        for entry in seeds {
            let (pair, rate) = entry.validate()?;
            self.upsert(pair, rate, entry.source);
        }
        Ok(count)
    }

    /// Load a JSON array of seed entries.
    pub fn load_json<R: Read>(&self, reader: R) -> FxResult<usize> {
        self.load(seed::parse_json(reader)?)
    }

    /// Get the full record for `pair`.
    pub fn get_latest(&self, pair: &CurrencyPair) -> Option<ExchangeRate> {
        self.rates.get(pair).map(|r| r.clone())
    }

    /// List records matching `filter`, sorted by pair.
    pub fn list(&self, filter: &RateFilter) -> Vec<ExchangeRate> {
        let mut records: Vec<ExchangeRate> = self
            .rates
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        records.sort_by(|a, b| a.pair.cmp(&b.pair));
        records
    }

    /// Remove the record for `pair`.
    pub fn remove(&self, pair: &CurrencyPair) -> Option<ExchangeRate> {
        self.rates.remove(pair).map(|(_, record)| record)
    }

    /// Remove all records.
    pub fn clear(&self) {
        self.rates.clear();
    }

    /// Get the number of stored pairs.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for InMemoryRateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RateStore for InMemoryRateStore {
    fn find_latest_rate(&self, pair: &CurrencyPair) -> Option<Rate> {
        self.rates.get(pair).map(|r| r.rate)
    }
}

/// Shared in-memory store.
pub type SharedRateStore = Arc<InMemoryRateStore>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use rust_decimal_macros::dec;

    fn pair(from: &str, to: &str) -> CurrencyPair {
        CurrencyPair::parse(from, to).unwrap()
    }

    fn rate(value: rust_decimal::Decimal) -> Rate {
        Rate::of(value).unwrap()
    }

    #[test]
    fn test_find_latest_rate() {
        let store = InMemoryRateStore::new();
        store.upsert(pair("USD", "EUR"), rate(dec!(0.85)), None);

        assert_eq!(
            store.find_latest_rate(&pair("USD", "EUR")),
            Some(rate(dec!(0.85)))
        );
        // Exact ordered pair only
        assert_eq!(store.find_latest_rate(&pair("EUR", "USD")), None);
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let store = InMemoryRateStore::new();
        let first = store.upsert(pair("USD", "EUR"), rate(dec!(0.85)), Some("ECB".into()));
        let second = store.upsert(pair("USD", "EUR"), rate(dec!(0.86)), None);

        assert_eq!(store.len(), 1);
        assert_eq!(second.id, first.id);
        assert_eq!(second.rate, rate(dec!(0.86)));
        assert_eq!(second.source, "ECB");
        assert_eq!(store.get_latest(&pair("USD", "EUR")).unwrap(), second);
    }

    #[test]
    fn test_list_with_filters() {
        let store = InMemoryRateStore::with_default_rates().unwrap();
        assert_eq!(store.len(), 8);

        let from_usd = store.list(&RateFilter::all().from(CurrencyCode::usd()));
        assert_eq!(from_usd.len(), 5);
        assert!(from_usd.windows(2).all(|w| w[0].pair < w[1].pair));

        let to_usd = store.list(&RateFilter::all().to(CurrencyCode::usd()));
        let pairs: Vec<String> = to_usd.iter().map(|r| r.pair.to_string()).collect();
        assert_eq!(pairs, vec!["EUR/USD", "GBP/USD"]);

        let exact = store.list(
            &RateFilter::all()
                .from(CurrencyCode::eur())
                .to(CurrencyCode::gbp()),
        );
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].rate, rate(dec!(0.86)));
    }

    #[test]
    fn test_remove_and_clear() {
        let store = InMemoryRateStore::with_default_rates().unwrap();

        let removed = store.remove(&pair("USD", "JPY")).unwrap();
        assert_eq!(removed.rate, rate(dec!(149.50)));
        assert!(store.find_latest_rate(&pair("USD", "JPY")).is_none());
        assert!(store.remove(&pair("USD", "JPY")).is_none());

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_json() {
        let store = InMemoryRateStore::new();
        let json = r#"[
            {"from": "EUR", "to": "USD", "rate": "1.18"},
            {"from": "USD", "to": "JPY", "rate": "110.0", "source": "Feed"}
        ]"#;

        let loaded = store.load_json(json.as_bytes()).unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(
            store.get_latest(&pair("USD", "JPY")).unwrap().source,
            "Feed"
        );
    }

    #[test]
    fn test_load_json_rejects_invalid_rate() {
        let store = InMemoryRateStore::new();
        let json = r#"[{"from": "EUR", "to": "USD", "rate": "0"}]"#;

        let result = store.load_json(json.as_bytes());

        assert!(matches!(result, Err(FxError::Validation(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_through_arc() {
        let store: SharedRateStore = Arc::new(InMemoryRateStore::new());
        store.upsert(pair("GBP", "USD"), rate(dec!(1.27)), None);

        let dynamic: Arc<dyn RateStore> = store.clone();
        assert_eq!(
            dynamic.find_latest_rate(&pair("GBP", "USD")),
            Some(rate(dec!(1.27)))
        );
    }
}
