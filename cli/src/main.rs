//! xrate CLI
//!
//! Resolves currency conversions against a local rate set.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Command, Context};
use xrate_fx::ResolverConfig;

/// xrate command line
#[derive(Parser, Debug)]
#[command(name = "xrate")]
#[command(about = "Resolve currency conversions from stored exchange rates")]
struct Args {
    /// JSON file of rates to load instead of the built-in data set
    #[arg(long, global = true)]
    rates_file: Option<std::path::PathBuf>,

    /// Pivot currency for chained conversions
    #[arg(long, global = true)]
    pivot: Option<String>,

    /// Disable chaining through the pivot currency
    #[arg(long, global = true)]
    no_pivot: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Convert an amount from one currency to another
    Convert {
        from: String,
        to: String,
        amount: String,
    },
    /// Show the effective rate between two currencies
    Quote { from: String, to: String },
    /// List stored rates
    Rates {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
}

impl From<Cmd> for Command {
    fn from(cmd: Cmd) -> Self {
        match cmd {
            Cmd::Convert { from, to, amount } => Command::Convert { from, to, amount },
            Cmd::Quote { from, to } => Command::Quote { from, to },
            Cmd::Rates { from, to } => Command::Rates { from, to },
        }
    }
}

fn init_logging(default_level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration; flags override environment
    let mut config = ResolverConfig::from_env()?;
    if let Some(pivot) = &args.pivot {
        config.pivot_currency = xrate_common::CurrencyCode::of(pivot)?;
    }
    if args.no_pivot {
        config.pivot_enabled = false;
    }

    init_logging(&config.log_level, args.json_logs);

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    info!(
        pivot = %config.pivot_currency,
        pivot_enabled = config.pivot_enabled,
        "Starting xrate"
    );

    let context = Context::load(config, args.rates_file.as_deref())?;

    match context.run(args.command.into()) {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            error!(code = e.error_code(), error = %e, "Command failed");
            Err(e.into())
        }
    }
}
