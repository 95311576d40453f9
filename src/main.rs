//! Marketplace Pricing — Quote CLI
//!
//! Prints the checkout quote for one or more seller prices.
//!
//! Wiring sequence:
//! 1. Parse command line
//! 2. Load config.toml + validate + build schedule book (path from `PRICING_CONFIG`)
//! 3. Init tracing (JSON structured logging on stderr)
//! 4. Quote every price, one JSON line per price on stdout

use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use tracing::info;

use marketplace_pricing::config;
use marketplace_pricing::domain::Cents;
use marketplace_pricing::usecases::QuoteService;

/// Quote buyer totals and fee splits for seller prices.
#[derive(Parser, Debug)]
#[command(name = "marketplace-pricing", version, about)]
struct CliArgs {
    /// Path to the pricing configuration.
    #[arg(long, env = "PRICING_CONFIG", default_value = "config.toml")]
    config: String,

    /// Region of the sale, for regional fee schedules.
    #[arg(long)]
    region: Option<String>,

    /// Time of the sale (RFC 3339); defaults to now.
    #[arg(long, value_parser = parse_rfc3339)]
    at: Option<DateTime<Utc>>,

    /// Seller prices in cents.
    #[arg(required = true, allow_negative_numbers = true)]
    prices: Vec<Cents>,
}

fn main() -> Result<()> {
    // ── 1. Parse command line ───────────────────────────────
    let args = CliArgs::parse();

    // ── 2. Load configuration and schedule book ─────────────
    let loaded = config::loader::load_config(&args.config)
        .context("Failed to load configuration")?;
    let config = &loaded.config;

    // ── 3. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level)),
        )
        .with_writer(io::stderr)
        .json()
        .init();

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        path = %args.config,
        schedules = config.schedules.len(),
        platform_fee_rate = config.fees.platform_fee_rate,
        processor_fee_rate = config.fees.processor_fee_rate,
        processor_fixed_fee_cents = config.fees.processor_fixed_fee_cents,
        "Configuration loaded, starting marketplace pricing"
    );

    // ── 4. Quote each price ─────────────────────────────────
    let service = QuoteService::new(loaded.book);
    let at = args.at.unwrap_or_else(Utc::now);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for price in &args.prices {
        let quote = service.quote(*price, args.region.as_deref(), at);
        serde_json::to_writer(&mut out, &quote).context("Failed to serialize quote")?;
        writeln!(out).context("Failed to write quote")?;
    }

    info!(quotes = args.prices.len(), "Quotes written");
    Ok(())
}

fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|at| at.with_timezone(&Utc))
}
