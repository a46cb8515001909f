//! val-lab: print a fair-value estimate and company context as JSON.
//!
//! Usage:
//!   cargo run -p val-lab -- AAPL
//!   cargo run -p val-lab -- AAPL --valuation-only
//!   cargo run -p val-lab -- msft --compact
//!
//! Reads FMP_API_KEY (and the other FMP_* / NEWS_* settings) from the environment or .env.

use std::sync::Arc;

use anyhow::{Context, Result};
use fmp_client::FmpClient;
use valuation_core::ValuationError;
use valuation_orchestrator::ValuationOrchestrator;

mod config;

use config::CliConfig;

const USAGE: &str = "usage: val-lab <SYMBOL> [--valuation-only] [--compact]";

#[derive(Debug, PartialEq)]
struct Args {
    symbol: String,
    valuation_only: bool,
    compact: bool,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut symbol = None;
    let mut valuation_only = false;
    let mut compact = false;

    for arg in args {
        match arg.as_str() {
            "--valuation-only" => valuation_only = true,
            "--compact" => compact = true,
            flag if flag.starts_with("--") => return None,
            s if symbol.is_none() => symbol = Some(s.to_string()),
            _ => return None,
        }
    }

    symbol.map(|symbol| Args {
        symbol,
        valuation_only,
        compact,
    })
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Logs go to stderr so stdout stays pure JSON
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let out = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    out.context("Failed to serialize output")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = parse_args(&raw) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let config = CliConfig::from_env()?;
    let client = FmpClient::from_env().context("Invalid FMP configuration")?;
    let orchestrator =
        ValuationOrchestrator::new(Arc::new(client)).with_facet_options(config.facets);

    if args.valuation_only {
        match orchestrator.valuate(&args.symbol).await {
            Ok(result) => println!("{}", to_json(&result, args.compact)?),
            Err(e) => {
                tracing::error!("Valuation failed for {}: {}", args.symbol, e);
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let analysis = match orchestrator.analyze(&args.symbol).await {
        Ok(analysis) => analysis,
        Err(e @ ValuationError::InvalidInput(_)) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", to_json(&analysis, args.compact)?);

    for facet in analysis.failed_facets() {
        eprintln!("warning: {} unavailable for {}", facet, analysis.symbol);
    }

    if !analysis.has_data() {
        std::process::exit(1);
    }

    Ok(())
}
