//! xrate FX Engine
//!
//! Resolves monetary conversions between currencies from a store of
//! exchange rates.
//!
//! # Features
//!
//! - Direct, inverted and single-hop pivot-chain rate resolution
//! - Exact decimal arithmetic with per-currency display precision
//! - In-memory rate store with JSON seeding
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use xrate_fx::{ConversionEngine, InMemoryRateStore, ResolverConfig};
//! use xrate_common::CurrencyCode;
//!
//! let store = Arc::new(InMemoryRateStore::with_default_rates()?);
//! let engine = ConversionEngine::new(store, ResolverConfig::default());
//!
//! let result = engine.resolve(&CurrencyCode::gbp(), &CurrencyCode::jpy(), dec!(100))?;
//! assert_eq!(result.path(), Some("GBP→USD→JPY"));
//! ```

pub mod config;
pub mod conversion;
pub mod engine;
pub mod error;
pub mod precision;
pub mod record;
pub mod seed;
pub mod store;

pub use config::ResolverConfig;
pub use conversion::{ConversionRequest, ConversionResponse, ConversionResult};
pub use engine::{ConversionEngine, ResolutionStrategy, ResolvedRate};
pub use error::{ErrorCategory, FxError, FxResult};
pub use precision::PrecisionPolicy;
pub use record::ExchangeRate;
pub use seed::RateSeed;
pub use store::{InMemoryRateStore, RateFilter, RateStore, SharedRateStore};
