//! Configuration Module - TOML-based Pricing Configuration
//!
//! Loads the fee schedules from `config.toml`. Rates are plain fractions
//! (`0.035` = 3.5%). Nothing about the fee schedule is hardcoded outside
//! this file and the standard defaults below.

pub mod loader;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Top-level pricing configuration.
///
/// Loaded from `config.toml` at startup and validated before any price is
/// quoted.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Application identity and logging.
  #[serde(default)]
  pub app: AppSection,
  /// Default fee schedule.
  #[serde(default)]
  pub fees: FeesConfig,
  /// Named overrides (regional or promotional).
  #[serde(default)]
  pub schedules: Vec<ScheduleConfig>,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable name, used in logs.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
  /// ISO 4217 currency of all amounts. Only EUR is supported.
  #[serde(default = "default_currency")]
  pub currency: String,
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
      currency: default_currency(),
    }
  }
}

/// Fee schedule rates.
#[derive(Debug, Clone, Deserialize)]
pub struct FeesConfig {
  /// Fraction of the seller price kept by the platform.
  #[serde(default = "default_platform_fee_rate")]
  pub platform_fee_rate: f64,
  /// Fraction of the total charge kept by the payment processor.
  #[serde(default = "default_processor_fee_rate")]
  pub processor_fee_rate: f64,
  /// Flat processor fee per transaction, in cents.
  #[serde(default = "default_processor_fixed_fee_cents")]
  pub processor_fixed_fee_cents: i64,
}

impl Default for FeesConfig {
  fn default() -> Self {
    Self {
      platform_fee_rate: default_platform_fee_rate(),
      processor_fee_rate: default_processor_fee_rate(),
      processor_fixed_fee_cents: default_processor_fixed_fee_cents(),
    }
  }
}

/// A named schedule override.
///
/// Windows are quoted RFC 3339 timestamps; `starts_at` is inclusive,
/// `ends_at` exclusive. Rates left out are inherited from `[fees]`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
  /// Unique name, reported in quotes.
  pub name: String,
  /// Region code this override is limited to.
  pub region: Option<String>,
  pub starts_at: Option<DateTime<Utc>>,
  pub ends_at: Option<DateTime<Utc>>,
  pub platform_fee_rate: Option<f64>,
  pub processor_fee_rate: Option<f64>,
  pub processor_fixed_fee_cents: Option<i64>,
}

impl ScheduleConfig {
  /// Rates of this override, falling back to `base` field by field.
  pub fn fees(&self, base: &FeesConfig) -> FeesConfig {
    FeesConfig {
      platform_fee_rate: self.platform_fee_rate.unwrap_or(base.platform_fee_rate),
      processor_fee_rate: self.processor_fee_rate.unwrap_or(base.processor_fee_rate),
      processor_fixed_fee_cents: self
        .processor_fixed_fee_cents
        .unwrap_or(base.processor_fixed_fee_cents),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "marketplace-pricing".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_currency() -> String {
  "EUR".to_string()
}

fn default_platform_fee_rate() -> f64 {
  0.035
}

fn default_processor_fee_rate() -> f64 {
  0.014 // European cards
}

fn default_processor_fixed_fee_cents() -> i64 {
  25
}
