//! Quote Service - Checkout Price Quotes
//!
//! Resolves the fee schedule for a sale (region + time) and produces
//! the full quote a checkout flow needs:
//! - Buyer-facing breakdown (subtotal, platform fee, total)
//! - Settlement split (seller transfer, processor fee, platform net)
//! - Display string for the total

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::domain::{
  format_eur, Cents, FeeCalculator, PriceBreakdown, ScheduleBook, Settlement,
};

/// Everything a checkout needs to know about one price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
  /// Seller's listed price.
  pub price_cents: Cents,
  /// Name of the override applied, `"default"` otherwise.
  pub schedule: String,
  pub breakdown: PriceBreakdown,
  pub settlement: Settlement,
  /// Total formatted for display, e.g. `"10,76 €"`.
  pub display_total: String,
}

/// Quotes prices against a schedule book.
pub struct QuoteService {
  book: ScheduleBook,
}

impl QuoteService {
  /// Create a quote service over a validated schedule book.
  pub const fn new(book: ScheduleBook) -> Self {
    Self { book }
  }

  /// Access the schedule book.
  pub const fn book(&self) -> &ScheduleBook {
    &self.book
  }

  /// Quote a seller price for a sale in `region` at time `at`.
  ///
  /// Non-positive prices are quoted as zero across the board; the
  /// checkout must reject them before creating a charge.
  #[instrument(skip(self), fields(schedule = tracing::field::Empty))]
  pub fn quote(&self, price_cents: Cents, region: Option<&str>, at: DateTime<Utc>) -> Quote {
    if price_cents <= 0 {
      warn!(price_cents, "Non-positive price, no charge applies");
    }

    let entry = self.book.select_entry(region, at);
    let schedule_name = entry.map_or("default", |e| e.name.as_str());
    tracing::Span::current().record("schedule", schedule_name);

    let calculator =
      FeeCalculator::new(entry.map_or(*self.book.default_schedule(), |e| e.schedule));
    let breakdown = if price_cents > 0 {
      calculator.breakdown(price_cents)
    } else {
      PriceBreakdown::default()
    };
    let settlement = calculator.settlement(price_cents);

    debug!(
      total_cents = breakdown.total_cents,
      platform_fee_cents = breakdown.platform_fee_cents,
      processor_fee_cents = settlement.processor_fee_cents,
      rounding_slack_cents = settlement.rounding_slack_cents,
      "Price quoted"
    );

    Quote {
      price_cents,
      schedule: schedule_name.to_string(),
      breakdown,
      settlement,
      display_total: format_eur(breakdown.total_cents),
    }
  }
}
