//! Resolver configuration.

use xrate_common::CurrencyCode;

use crate::error::{FxError, FxResult};
use crate::precision::{PrecisionPolicy, MAX_SCALE};

/// Configuration for the conversion engine.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Intermediate currency for one-hop chains.
    pub pivot_currency: CurrencyCode,
    /// Whether to try a pivot chain when no direct or reverse rate exists.
    pub pivot_enabled: bool,
    /// Display precision for converted amounts.
    pub precision: PrecisionPolicy,
    /// Log level.
    pub log_level: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            pivot_currency: CurrencyCode::usd(),
            pivot_enabled: true,
            precision: PrecisionPolicy::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ResolverConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> FxResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> FxResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(pivot) = lookup("XRATE_PIVOT_CURRENCY") {
            config.pivot_currency = CurrencyCode::of(&pivot)?;
        }

        if let Some(enabled) = lookup("XRATE_PIVOT_ENABLED") {
            config.pivot_enabled = parse_bool(&enabled).ok_or_else(|| {
                FxError::Configuration(format!("XRATE_PIVOT_ENABLED is not a boolean: {enabled}"))
            })?;
        }

        if let Some(overrides) = lookup("XRATE_PRECISION") {
            config.precision = parse_precision(config.precision, &overrides)?;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> FxResult<()> {
        if self.precision.fallback_scale() > MAX_SCALE {
            return Err(FxError::Configuration(format!(
                "Fallback scale {} exceeds {}",
                self.precision.fallback_scale(),
                MAX_SCALE
            )));
        }

        if let Some((code, scale)) = self.precision.entries().find(|(_, s)| *s > MAX_SCALE) {
            return Err(FxError::Configuration(format!(
                "Scale {scale} for {code} exceeds {MAX_SCALE}"
            )));
        }

        if self.log_level.trim().is_empty() {
            return Err(FxError::Configuration("Log level cannot be empty".to_string()));
        }

        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse `CODE:SCALE` entries separated by commas, e.g. `BHD:3,KRW:0`.
pub fn parse_precision(mut policy: PrecisionPolicy, raw: &str) -> FxResult<PrecisionPolicy> {
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (code, scale) = item.split_once(':').ok_or_else(|| {
            FxError::Configuration(format!("Precision entry must be CODE:SCALE, got {item}"))
        })?;
        let code = CurrencyCode::of(code)?;
        let scale: u32 = scale.trim().parse().map_err(|_| {
            FxError::Configuration(format!("Invalid scale for {code}: {scale}"))
        })?;
        policy = policy.with_scale(code, scale);
    }
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pivot_currency, CurrencyCode::usd());
        assert!(config.pivot_enabled);
    }

    #[test]
    fn test_from_lookup() {
        let config = ResolverConfig::from_lookup(lookup(&[
            ("XRATE_PIVOT_CURRENCY", "eur"),
            ("XRATE_PIVOT_ENABLED", "off"),
            ("XRATE_PRECISION", "BHD:3, krw:0"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.pivot_currency, CurrencyCode::eur());
        assert!(!config.pivot_enabled);
        assert_eq!(config.precision.scale_for(&CurrencyCode::of("BHD").unwrap()), 3);
        assert_eq!(config.precision.scale_for(&CurrencyCode::of("KRW").unwrap()), 0);
        assert_eq!(config.precision.scale_for(&CurrencyCode::jpy()), 0);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_env_values() {
        let result = ResolverConfig::from_lookup(lookup(&[("XRATE_PIVOT_CURRENCY", "DOLLAR")]));
        assert!(matches!(result, Err(FxError::Validation(_))));

        let result = ResolverConfig::from_lookup(lookup(&[("XRATE_PIVOT_ENABLED", "maybe")]));
        assert!(matches!(result, Err(FxError::Configuration(_))));

        let result = ResolverConfig::from_lookup(lookup(&[("XRATE_PRECISION", "BHD=3")]));
        assert!(matches!(result, Err(FxError::Configuration(_))));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = ResolverConfig::default();
        config.precision = config.precision.with_scale(CurrencyCode::eur(), 40);
        assert!(config.validate().is_err());
    }
}
