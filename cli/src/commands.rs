//! Command execution against a loaded rate set.

use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use xrate_common::{CurrencyCode, ValidationError};
use xrate_fx::{
    ConversionEngine, ConversionRequest, ConversionResult, ExchangeRate, FxError, FxResult,
    InMemoryRateStore, RateFilter, ResolvedRate, ResolverConfig, SharedRateStore,
};

/// A command with its raw arguments.
#[derive(Debug, Clone)]
pub enum Command {
    Convert {
        from: String,
        to: String,
        amount: String,
    },
    Quote {
        from: String,
        to: String,
    },
    Rates {
        from: Option<String>,
        to: Option<String>,
    },
}

/// Store and engine shared by all commands.
pub struct Context {
    store: SharedRateStore,
    engine: ConversionEngine,
}

impl Context {
    /// Build the store from `rates_file`, or the default data set.
    pub fn load(config: ResolverConfig, rates_file: Option<&Path>) -> FxResult<Self> {
        let store = match rates_file {
            Some(path) => {
                let file = File::open(path)
                    .map_err(|e| FxError::RateSeed(format!("{}: {}", path.display(), e)))?;
                let store = InMemoryRateStore::new();
                let loaded = store.load_json(file)?;
                info!(path = %path.display(), loaded, "Loaded rates file");
                store
            }
            None => InMemoryRateStore::with_default_rates()?,
        };

        Ok(Self::with_store(Arc::new(store), config))
    }

    /// Build a context over an existing store.
    pub fn with_store(store: SharedRateStore, config: ResolverConfig) -> Self {
        let engine = ConversionEngine::new(store.clone(), config);
        Self { store, engine }
    }

    /// Execute a command.
    pub fn run(&self, command: Command) -> FxResult<Output> {
        match command {
            Command::Convert { from, to, amount } => {
                let amount = Decimal::from_str(amount.trim())
                    .map_err(|_| ValidationError::InvalidAmount(amount.clone()))?;
                let request = ConversionRequest::new(from, to, amount);
                Ok(Output::Conversion(self.engine.resolve_request(&request)?))
            }
            Command::Quote { from, to } => {
                let from = CurrencyCode::of(&from)?;
                let to = CurrencyCode::of(&to)?;
                Ok(Output::Quote(self.engine.resolve_rate(&from, &to)?))
            }
            Command::Rates { from, to } => {
                let mut filter = RateFilter::all();
                if let Some(from) = from {
                    filter = filter.from(CurrencyCode::of(&from)?);
                }
                if let Some(to) = to {
                    filter = filter.to(CurrencyCode::of(&to)?);
                }
                Ok(Output::Rates(self.store.list(&filter)))
            }
        }
    }
}

/// Command output, rendered as JSON by the binary.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Output {
    Conversion(ConversionResult),
    Quote(ResolvedRate),
    Rates(Vec<ExchangeRate>),
}
