//! Conversion resolution engine.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument};
use xrate_common::{CurrencyCode, CurrencyPair, Rate, ValidationError};

use crate::config::ResolverConfig;
use crate::conversion::{ConversionRequest, ConversionResult};
use crate::error::{FxError, FxResult};
use crate::store::RateStore;

/// How a rate was obtained from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Stored for the exact pair.
    Direct,
    /// Stored for the reversed pair and inverted.
    Reverse,
    /// Two legs through the pivot currency.
    Pivot,
}

impl fmt::Display for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionStrategy::Direct => "direct",
            ResolutionStrategy::Reverse => "reverse",
            ResolutionStrategy::Pivot => "pivot",
        };
        write!(f, "{}", name)
    }
}

/// A rate quote for a pair without an amount attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRate {
    pub pair: CurrencyPair,
    pub rate: Rate,
    pub strategy: ResolutionStrategy,
    pub path: Option<String>,
}

/// Both legs of a pivot chain.
struct PivotLegs {
    pivot: CurrencyCode,
    to_pivot: Rate,
    from_pivot: Rate,
}

/// Resolves conversions against a [`RateStore`].
///
/// Strategies are tried in order: direct rate, inverted reverse rate, then a
/// single hop through the pivot currency. The engine holds no mutable state
/// and only ever reads from the store.
pub struct ConversionEngine {
    store: Arc<dyn RateStore>,
    config: ResolverConfig,
}

impl ConversionEngine {
    /// Create a new engine over the given store.
    pub fn new(store: Arc<dyn RateStore>, config: ResolverConfig) -> Self {
        Self { store, config }
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Convert `amount` of `from` into `to`.
    #[instrument(skip(self), fields(from = %from, to = %to, amount = %amount))]
    pub fn resolve(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: Decimal,
    ) -> FxResult<ConversionResult> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidAmount(amount.to_string()).into());
        }
        let pair = CurrencyPair::of(from.clone(), to.clone())?;

        let result = if let Some((rate, strategy)) = self.single_hop(&pair) {
            let converted = checked_mul(amount, rate.value(), &pair)?;
            let to_amount = self.display_amount(converted, to, &pair)?;
            let effective = working_rate(rate.value(), &pair)?;

            debug!(strategy = %strategy, rate = %effective, "Single-hop conversion");
            ConversionResult::direct(pair, amount, to_amount, effective)
        } else if let Some(legs) = self.pivot_legs(&pair) {
            let pivot_amount = checked_mul(amount, legs.to_pivot.value(), &pair)?;
            let final_amount = checked_mul(pivot_amount, legs.from_pivot.value(), &pair)?;
            let ratio = final_amount
                .checked_div(amount)
                .ok_or_else(|| FxError::ArithmeticOverflow(pair.clone()))?;
            let effective = working_rate(ratio, &pair)?;
            let to_amount = self.display_amount(final_amount, to, &pair)?;
            let path = chain_path(from, &legs.pivot, to);

            debug!(
                pivot = %legs.pivot,
                pivot_amount = %pivot_amount,
                "Pivot-chain conversion"
            );
            ConversionResult::chained(pair, amount, to_amount, effective, path)
        } else {
            debug!(pair = %pair, "No rate path found");
            return Err(FxError::RateNotFound(pair));
        };

        info!(
            to_amount = %result.to_amount(),
            effective_rate = %result.rate(),
            path = result.path().unwrap_or("-"),
            "Conversion resolved"
        );

        Ok(result)
    }

    /// Validate a raw request and resolve it.
    pub fn resolve_request(&self, request: &ConversionRequest) -> FxResult<ConversionResult> {
        let (from, to, amount) = request.validate()?;
        self.resolve(&from, &to, amount)
    }

    /// Quote the effective rate from `from` to `to`.
    #[instrument(skip(self), fields(from = %from, to = %to))]
    pub fn resolve_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> FxResult<ResolvedRate> {
        let pair = CurrencyPair::of(from.clone(), to.clone())?;

        if let Some((rate, strategy)) = self.single_hop(&pair) {
            let rate = working_rate(rate.value(), &pair)?;
            return Ok(ResolvedRate {
                pair,
                rate,
                strategy,
                path: None,
            });
        }

        if let Some(legs) = self.pivot_legs(&pair) {
            let product = checked_mul(legs.to_pivot.value(), legs.from_pivot.value(), &pair)?;
            let rate = working_rate(product, &pair)?;
            let path = chain_path(from, &legs.pivot, to);
            return Ok(ResolvedRate {
                pair,
                rate,
                strategy: ResolutionStrategy::Pivot,
                path: Some(path),
            });
        }

        Err(FxError::RateNotFound(pair))
    }

    /// Round the converted amount to the display scale of `to`.
    fn display_amount(
        &self,
        amount: Decimal,
        to: &CurrencyCode,
        pair: &CurrencyPair,
    ) -> FxResult<Decimal> {
        self.config
            .precision
            .round(amount, to)
            .ok_or_else(|| FxError::ArithmeticOverflow(pair.clone()))
    }

    /// Direct lookup, then inverted reverse lookup.
    fn single_hop(&self, pair: &CurrencyPair) -> Option<(Rate, ResolutionStrategy)> {
        if let Some(rate) = self.store.find_latest_rate(pair) {
            debug!(pair = %pair, rate = %rate, "Direct rate found");
            return Some((rate, ResolutionStrategy::Direct));
        }

        let reversed = pair.reverse();
        if let Some(rate) = self.store.find_latest_rate(&reversed) {
            let inverted = rate.inverse();
            debug!(pair = %reversed, rate = %rate, inverted = %inverted, "Reverse rate found");
            return Some((inverted, ResolutionStrategy::Reverse));
        }

        None
    }

    /// Resolve both legs through the pivot, one hop each.
    fn pivot_legs(&self, pair: &CurrencyPair) -> Option<PivotLegs> {
        let pivot = &self.config.pivot_currency;
        if !self.config.pivot_enabled || pair.involves(pivot) {
            return None;
        }

        let to_pivot = CurrencyPair::of(pair.from().clone(), pivot.clone()).ok()?;
        let from_pivot = CurrencyPair::of(pivot.clone(), pair.to().clone()).ok()?;

        let Some((leg1, _)) = self.single_hop(&to_pivot) else {
            debug!(leg = %to_pivot, "Pivot leg missing");
            return None;
        };
        let Some((leg2, _)) = self.single_hop(&from_pivot) else {
            debug!(leg = %from_pivot, "Pivot leg missing");
            return None;
        };

        Some(PivotLegs {
            pivot: pivot.clone(),
            to_pivot: leg1,
            from_pivot: leg2,
        })
    }
}

fn checked_mul(a: Decimal, b: Decimal, pair: &CurrencyPair) -> FxResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| FxError::ArithmeticOverflow(pair.clone()))
}

/// Round an effective rate to working scale, rejecting values that vanished.
fn working_rate(value: Decimal, pair: &CurrencyPair) -> FxResult<Rate> {
    if value <= Decimal::ZERO {
        return Err(FxError::ArithmeticOverflow(pair.clone()));
    }
    Rate::at_working_scale(value).map_err(FxError::from)
}

fn chain_path(from: &CurrencyCode, pivot: &CurrencyCode, to: &CurrencyCode) -> String {
    format!("{}→{}→{}", from, pivot, to)
}
