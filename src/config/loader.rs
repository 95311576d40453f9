//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating every fee schedule once at
//! startup, and building the [`ScheduleBook`] used for quoting.

use std::path::Path;

use anyhow::{Context, Result};

use super::{AppConfig, FeesConfig};
use crate::domain::{FeeSchedule, NamedSchedule, ScheduleBook};

/// A validated configuration together with the schedule book built from it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
  pub config: AppConfig,
  pub book: ScheduleBook,
}

/// Load and validate configuration from a TOML file.
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<LoadedConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  parse_config(&content)
}

/// Parse and validate configuration from TOML text.
///
/// # Errors
/// Returns an error if parsing fails or validation rules are violated.
pub fn parse_config(content: &str) -> Result<LoadedConfig> {
  let config: AppConfig = toml::from_str(content)
    .with_context(|| "Failed to parse config.toml")?;

  let book = validate_config(&config)?;

  Ok(LoadedConfig { config, book })
}

/// Build the schedule book described by a configuration.
///
/// # Errors
/// Returns an error if a schedule has out-of-range rates, two overrides
/// share a name, or a window is empty.
pub fn build_book(config: &AppConfig) -> Result<ScheduleBook> {
  let default = schedule_from(&config.fees).context("Invalid [fees] schedule")?;

  let entries = config
    .schedules
    .iter()
    .map(|entry| -> Result<NamedSchedule> {
      let schedule = schedule_from(&entry.fees(&config.fees))
        .with_context(|| format!("Invalid schedule {}", entry.name))?;
      let mut named = NamedSchedule::new(entry.name.clone(), schedule)
        .during(entry.starts_at, entry.ends_at);
      if let Some(region) = &entry.region {
        named = named.in_region(region.clone());
      }
      Ok(named)
    })
    .collect::<Result<Vec<_>>>()?;

  let book = ScheduleBook::from_entries(default, entries)?;
  Ok(book)
}

fn schedule_from(fees: &FeesConfig) -> Result<FeeSchedule> {
  let schedule = FeeSchedule::from_f64(
    fees.platform_fee_rate,
    fees.processor_fee_rate,
    fees.processor_fixed_fee_cents,
  )?;
  Ok(schedule)
}

/// Validate all configuration parameters and return the schedule book.
///
/// Checks for:
/// - Supported currency
/// - Non-empty override names and regions
/// - Rates in range, unique names and non-empty windows (via the book)
fn validate_config(config: &AppConfig) -> Result<ScheduleBook> {
  anyhow::ensure!(
    config.app.currency.eq_ignore_ascii_case("EUR"),
    "Only EUR amounts are supported, got currency {}",
    config.app.currency
  );

  for (i, schedule) in config.schedules.iter().enumerate() {
    anyhow::ensure!(
      !schedule.name.trim().is_empty(),
      "Schedule {} has an empty name",
      i
    );
    if let Some(region) = &schedule.region {
      anyhow::ensure!(
        !region.trim().is_empty(),
        "Schedule {} has an empty region",
        schedule.name
      );
    }
  }

  build_book(config)
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_empty_config_uses_standard_schedule() {
    let loaded = parse_config("").unwrap();
    assert_eq!(*loaded.book.default_schedule(), FeeSchedule::standard());
    assert!(loaded.book.entries().is_empty());
    assert_eq!(loaded.config.app.log_level, "info");
  }

  #[test]
  fn test_override_inherits_missing_rates() {
    let loaded = parse_config(
      r#"
      [fees]
      platform_fee_rate = 0.05
      processor_fee_rate = 0.02
      processor_fixed_fee_cents = 30

      [[schedules]]
      name = "welcome-week"
      starts_at = "2025-09-01T00:00:00Z"
      ends_at = "2025-09-08T00:00:00Z"
      platform_fee_rate = 0.0
      "#,
    )
    .unwrap();

    let promo = loaded.book.get("welcome-week").unwrap();
    assert!(promo.schedule.platform_fee_rate().is_zero());
    assert_eq!(promo.schedule.processor_fee_rate(), dec!(0.02));
    assert_eq!(promo.schedule.processor_fixed_fee_cents(), 30);
    assert!(promo.starts_at.is_some());
  }

  #[test]
  fn test_loaded_book_matches_rebuilt_book() {
    let loaded = parse_config(
      r#"
      [[schedules]]
      name = "coruna"
      region = "udc"
      platform_fee_rate = 0.02
      "#,
    )
    .unwrap();
    let rebuilt = build_book(&loaded.config).unwrap();
    assert_eq!(loaded.book.entries(), rebuilt.entries());
    assert_eq!(loaded.book.default_schedule(), rebuilt.default_schedule());
  }

  #[test]
  fn test_rejects_processor_rate_of_one() {
    let err = parse_config(
      r#"
      [fees]
      processor_fee_rate = 1.0
      "#,
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("processor fee rate must be < 1"));
  }

  #[test]
  fn test_rejects_bad_override_with_its_name() {
    let err = parse_config(
      r#"
      [[schedules]]
      name = "broken"
      platform_fee_rate = -0.1
      "#,
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("broken"));
  }

  #[test]
  fn test_rejects_duplicate_names() {
    let result = parse_config(
      r#"
      [[schedules]]
      name = "promo"

      [[schedules]]
      name = "promo"
      region = "gal"
      "#,
    );
    assert!(result.is_err());
  }

  #[test]
  fn test_rejects_other_currencies() {
    let result = parse_config(
      r#"
      [app]
      currency = "USD"
      "#,
    );
    assert!(result.is_err());
  }
}
