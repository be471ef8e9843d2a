//! Display precision for converted amounts.

use std::collections::HashMap;

use rust_decimal::Decimal;
use xrate_common::{CurrencyCode, ROUNDING, WORKING_SCALE};

/// Largest scale a `Decimal` can carry.
pub const MAX_SCALE: u32 = 28;

/// Maps each currency to the number of fractional digits shown to callers.
///
/// Only the final converted amount goes through this policy; rate algebra
/// stays at [`WORKING_SCALE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecisionPolicy {
    scales: HashMap<CurrencyCode, u32>,
    fallback_scale: u32,
}

impl PrecisionPolicy {
    /// Create an empty policy where every currency uses `fallback_scale`.
    pub fn empty(fallback_scale: u32) -> Self {
        Self {
            scales: HashMap::new(),
            fallback_scale,
        }
    }

    /// Override the scale for one currency.
    pub fn with_scale(mut self, code: CurrencyCode, scale: u32) -> Self {
        self.scales.insert(code, scale);
        self
    }

    /// Scale used for `code`.
    pub fn scale_for(&self, code: &CurrencyCode) -> u32 {
        self.scales
            .get(code)
            .copied()
            .unwrap_or(self.fallback_scale)
    }

    /// Scale used for currencies with no explicit entry.
    pub fn fallback_scale(&self) -> u32 {
        self.fallback_scale
    }

    /// Iterate over the explicit entries.
    pub fn entries(&self) -> impl Iterator<Item = (&CurrencyCode, u32)> {
        self.scales.iter().map(|(code, scale)| (code, *scale))
    }

    /// Round `amount` half-up to the scale of `code`.
    ///
    /// The returned value carries exactly that scale, so `100` in USD comes
    /// back as `100.00`. Returns `None` when the scale exceeds [`MAX_SCALE`]
    /// or the amount has too many integer digits to hold it.
    pub fn round(&self, amount: Decimal, code: &CurrencyCode) -> Option<Decimal> {
        let scale = self.scale_for(code);
        if scale > MAX_SCALE {
            return None;
        }
        let mut rounded = amount.round_dp_with_strategy(scale, ROUNDING);
        rounded.rescale(scale);
        (rounded.scale() == scale).then_some(rounded)
    }
}

impl Default for PrecisionPolicy {
    fn default() -> Self {
        let two_digit = ["TWD", "CNY", "USD", "CHF", "AUD", "CAD", "EUR", "GBP"];

        let mut scales = HashMap::new();
        scales.insert(CurrencyCode::jpy(), 0);
        for code in two_digit {
            if let Ok(code) = CurrencyCode::of(code) {
                scales.insert(code, 2);
            }
        }

        Self {
            scales,
            fallback_scale: WORKING_SCALE,
        }
    }
}
