//! Fee schedule: the rates a [`FeeCalculator`](super::FeeCalculator) is built with.
//!
//! A schedule is validated once, when it is constructed. After that every
//! calculation over it is total, so callers never handle errors per price.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

use super::money::Cents;

/// Reasons a fee schedule is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeeScheduleError {
    #[error("platform fee rate must be >= 0, got {0}")]
    NegativePlatformRate(Decimal),
    #[error("processor fee rate must be >= 0, got {0}")]
    NegativeProcessorRate(Decimal),
    /// The total formula divides by `1 - processor_fee_rate`.
    #[error("processor fee rate must be < 1, got {0}")]
    ProcessorRateTooHigh(Decimal),
    #[error("processor fixed fee must be >= 0 cents, got {0}")]
    NegativeFixedFee(Cents),
    #[error("{name} must be a finite decimal number, got {value}")]
    InvalidRate { name: &'static str, value: f64 },
}

/// Immutable, validated fee schedule.
///
/// - `platform_fee_rate` applies to the seller price.
/// - `processor_fee_rate` and `processor_fixed_fee_cents` apply to the
///   total charged to the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeSchedule {
    platform_fee_rate: Decimal,
    processor_fee_rate: Decimal,
    processor_fixed_fee_cents: Cents,
}

impl FeeSchedule {
    /// Builds a schedule, rejecting rates outside their valid domain.
    ///
    /// # Errors
    /// Returns [`FeeScheduleError`] if a rate or the fixed fee is negative,
    /// or if the processor rate is 1 or more.
    pub fn new(
        platform_fee_rate: Decimal,
        processor_fee_rate: Decimal,
        processor_fixed_fee_cents: Cents,
    ) -> Result<Self, FeeScheduleError> {
        if platform_fee_rate < Decimal::ZERO {
            return Err(FeeScheduleError::NegativePlatformRate(platform_fee_rate));
        }
        if processor_fee_rate < Decimal::ZERO {
            return Err(FeeScheduleError::NegativeProcessorRate(processor_fee_rate));
        }
        if processor_fee_rate >= Decimal::ONE {
            return Err(FeeScheduleError::ProcessorRateTooHigh(processor_fee_rate));
        }
        if processor_fixed_fee_cents < 0 {
            return Err(FeeScheduleError::NegativeFixedFee(processor_fixed_fee_cents));
        }

        Ok(Self {
            platform_fee_rate,
            processor_fee_rate,
            processor_fixed_fee_cents,
        })
    }

    /// Builds a schedule from configuration floats.
    ///
    /// Each float goes through its shortest decimal representation, so a
    /// configured `0.035` becomes exactly `0.035` rather than the nearest
    /// binary fraction.
    ///
    /// # Errors
    /// Returns [`FeeScheduleError::InvalidRate`] for NaN or infinite
    /// rates, otherwise the same errors as [`FeeSchedule::new`].
    pub fn from_f64(
        platform_fee_rate: f64,
        processor_fee_rate: f64,
        processor_fixed_fee_cents: Cents,
    ) -> Result<Self, FeeScheduleError> {
        let platform = rate_from_f64("platform_fee_rate", platform_fee_rate)?;
        let processor = rate_from_f64("processor_fee_rate", processor_fee_rate)?;
        Self::new(platform, processor, processor_fixed_fee_cents)
    }

    /// Marketplace standard: 3.5% platform commission, 1.4% + 25 cents
    /// processor fee (European cards).
    pub fn standard() -> Self {
        Self {
            platform_fee_rate: dec!(0.035),
            processor_fee_rate: dec!(0.014),
            processor_fixed_fee_cents: 25,
        }
    }

    /// Fraction of the seller price kept by the platform.
    pub const fn platform_fee_rate(&self) -> Decimal {
        self.platform_fee_rate
    }

    /// Fraction of the total charge kept by the payment processor.
    pub const fn processor_fee_rate(&self) -> Decimal {
        self.processor_fee_rate
    }

    /// Flat processor fee per transaction, in cents.
    pub const fn processor_fixed_fee_cents(&self) -> Cents {
        self.processor_fixed_fee_cents
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

fn rate_from_f64(name: &'static str, value: f64) -> Result<Decimal, FeeScheduleError> {
    if !value.is_finite() {
        return Err(FeeScheduleError::InvalidRate { name, value });
    }
    // f64 Display is the shortest string that round-trips.
    Decimal::from_str(&value.to_string())
        .map_err(|_| FeeScheduleError::InvalidRate { name, value })
}
