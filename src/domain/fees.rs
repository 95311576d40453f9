//! Marketplace fee calculation engine.
//!
//! Converts a seller's requested net price into the platform commission and
//! the gross amount the buyer is charged. The processor fee is charged on
//! the gross total, the platform fee on the seller price:
//!
//! ```text
//! T = P + P * rp + (T * rs + ff)
//! T = (P * (1 + rp) + ff) / (1 - rs)
//! ```
//!
//! Rounding is explicit per operation:
//! - platform and processor fees: nearest cent, ties away from zero
//! - total: always up, so the seller is never short-paid by rounding
//!
//! All arithmetic is exact base-10 (`Decimal`); only whole cents leave
//! this module.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Cents;
use super::schedule::FeeSchedule;

/// Buyer-facing price breakdown shown at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Seller's listed price.
    pub subtotal_cents: Cents,
    /// Platform commission (buyer protection).
    pub platform_fee_cents: Cents,
    /// Gross amount charged to the buyer.
    pub total_cents: Cents,
}

/// How a completed charge splits between seller, processor and platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settlement {
    /// Gross amount charged to the buyer.
    pub total_cents: Cents,
    /// Transferred to the seller: exactly the listed price.
    pub seller_amount_cents: Cents,
    /// Everything the platform holds back (`total - seller`).
    pub application_fee_cents: Cents,
    /// Estimated processor deduction on the total.
    pub processor_fee_cents: Cents,
    /// What the platform keeps after paying the processor.
    pub platform_net_cents: Cents,
    /// `total - processor fee - platform fee - price`. Never below -1.
    pub rounding_slack_cents: Cents,
}

/// Fee calculator over a single validated [`FeeSchedule`].
///
/// Stateless apart from the schedule; cheap to copy and safe to share
/// across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeCalculator {
    schedule: FeeSchedule,
}

impl FeeCalculator {
    /// Creates a calculator for the given schedule.
    pub const fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    /// Calculator using the marketplace standard schedule.
    pub fn standard() -> Self {
        Self::new(FeeSchedule::standard())
    }

    /// The schedule this calculator applies.
    pub const fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Platform commission on a seller price.
    ///
    /// Formula: round_half_away(price * platform_fee_rate). Linear and
    /// defined for every input; a negative price yields a non-positive fee.
    pub fn platform_fee(&self, price_cents: Cents) -> Cents {
        let price = Decimal::from(price_cents);
        let fee = price
            .checked_mul(self.schedule.platform_fee_rate())
            .unwrap_or_else(|| saturated(price_cents < 0));
        round_half_away(fee)
    }

    /// Total the buyer pays so the seller nets `price_cents` after the
    /// platform and processor fees.
    ///
    /// Returns 0 for `price_cents <= 0`: there is no transaction to price.
    pub fn total_with_fees(&self, price_cents: Cents) -> Cents {
        if price_cents <= 0 {
            return 0;
        }

        let price = Decimal::from(price_cents);
        let gross_up = Decimal::ONE + self.schedule.platform_fee_rate();
        // Validated: processor rate < 1, so the denominator is positive.
        let denominator = Decimal::ONE - self.schedule.processor_fee_rate();

        let total = price
            .checked_mul(gross_up)
            .and_then(|base| {
                base.checked_add(Decimal::from(self.schedule.processor_fixed_fee_cents()))
            })
            .and_then(|numerator| numerator.checked_div(denominator))
            .unwrap_or(Decimal::MAX);

        to_cents(total.ceil())
    }

    /// Estimated processor deduction on a charge of `total_cents`:
    /// round_half_away(total * processor_fee_rate) + fixed fee.
    ///
    /// Returns 0 for `total_cents <= 0`: nothing is charged.
    pub fn processor_fee(&self, total_cents: Cents) -> Cents {
        if total_cents <= 0 {
            return 0;
        }

        let variable = Decimal::from(total_cents)
            .checked_mul(self.schedule.processor_fee_rate())
            .unwrap_or(Decimal::MAX);
        round_half_away(variable).saturating_add(self.schedule.processor_fixed_fee_cents())
    }

    /// Checkout breakdown for a listing price.
    pub fn breakdown(&self, price_cents: Cents) -> PriceBreakdown {
        PriceBreakdown {
            subtotal_cents: price_cents,
            platform_fee_cents: self.platform_fee(price_cents),
            total_cents: self.total_with_fees(price_cents),
        }
    }

    /// Split of the charge once the buyer has paid.
    ///
    /// All fields are 0 for `price_cents <= 0`.
    pub fn settlement(&self, price_cents: Cents) -> Settlement {
        if price_cents <= 0 {
            return Settlement::default();
        }

        let total = self.total_with_fees(price_cents);
        let processor_fee = self.processor_fee(total);
        let platform_fee = self.platform_fee(price_cents);
        let application_fee = total.saturating_sub(price_cents);

        Settlement {
            total_cents: total,
            seller_amount_cents: price_cents,
            application_fee_cents: application_fee,
            processor_fee_cents: processor_fee,
            platform_net_cents: application_fee.saturating_sub(processor_fee),
            rounding_slack_cents: total
                .saturating_sub(processor_fee)
                .saturating_sub(platform_fee)
                .saturating_sub(price_cents),
        }
    }
}

fn round_half_away(amount: Decimal) -> Cents {
    to_cents(amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

/// Whole-cent `Decimal` to `Cents`, saturating outside the `i64` range.
fn to_cents(amount: Decimal) -> Cents {
    amount.to_i64().unwrap_or(if amount.is_sign_negative() {
        Cents::MIN
    } else {
        Cents::MAX
    })
}

const fn saturated(negative: bool) -> Decimal {
    if negative { Decimal::MIN } else { Decimal::MAX }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_platform_fee_standard_amounts() {
        let calc = FeeCalculator::standard();
        assert_eq!(calc.platform_fee(1000), 35);
        assert_eq!(calc.platform_fee(10000), 350);
    }

    #[test]
    fn test_platform_fee_ties_round_up() {
        // 3.5% of 100 = 3.5
        let calc = FeeCalculator::standard();
        assert_eq!(calc.platform_fee(100), 4);
        assert_eq!(calc.platform_fee(999), 35);
    }

    #[test]
    fn test_platform_fee_negative_price_is_linear() {
        let calc = FeeCalculator::standard();
        assert_eq!(calc.platform_fee(0), 0);
        assert_eq!(calc.platform_fee(-100), -4);
        assert_eq!(calc.platform_fee(-1000), -35);
    }

    #[test]
    fn test_total_zero_and_negative_price() {
        let calc = FeeCalculator::standard();
        assert_eq!(calc.total_with_fees(0), 0);
        assert_eq!(calc.total_with_fees(-100), 0);
        assert_eq!(calc.total_with_fees(Cents::MIN), 0);
    }

    #[test]
    fn test_total_for_ten_euros() {
        // (1035 + 25) / 0.986 = 1075.05...
        let calc = FeeCalculator::standard();
        let total = calc.total_with_fees(1000);
        assert_eq!(total, 1076);
        assert!(total > 1000 && total < 1100);
    }

    #[test]
    fn test_total_known_values() {
        let calc = FeeCalculator::standard();
        assert_eq!(calc.total_with_fees(1), 27);
        assert_eq!(calc.total_with_fees(100), 131);
        assert_eq!(calc.total_with_fees(999), 1075);
        assert_eq!(calc.total_with_fees(5000), 5274);
        assert_eq!(calc.total_with_fees(10000), 10523);
    }

    #[test]
    fn test_total_exact_quotient_not_bumped() {
        // 800 * 1.125 / 0.9 = 1000 exactly
        let schedule = FeeSchedule::new(dec!(0.125), dec!(0.1), 0).unwrap();
        let calc = FeeCalculator::new(schedule);
        assert_eq!(calc.total_with_fees(800), 1000);
    }

    #[test]
    fn test_total_saturates_for_huge_prices() {
        let calc = FeeCalculator::standard();
        assert_eq!(calc.total_with_fees(Cents::MAX), Cents::MAX);
    }

    #[test]
    fn test_zero_fee_schedule_is_identity() {
        let schedule = FeeSchedule::new(Decimal::ZERO, Decimal::ZERO, 0).unwrap();
        let calc = FeeCalculator::new(schedule);
        assert_eq!(calc.total_with_fees(1234), 1234);
        assert_eq!(calc.platform_fee(1234), 0);
    }

    #[test]
    fn test_processor_fee() {
        let calc = FeeCalculator::standard();
        // 1076 * 0.014 = 15.064
        assert_eq!(calc.processor_fee(1076), 40);
        assert_eq!(calc.processor_fee(0), 0);
        assert_eq!(calc.processor_fee(-5), 0);
    }

    #[test]
    fn test_breakdown() {
        let calc = FeeCalculator::standard();
        let b = calc.breakdown(1000);
        assert_eq!(
            b,
            PriceBreakdown {
                subtotal_cents: 1000,
                platform_fee_cents: 35,
                total_cents: 1076,
            }
        );
    }

    #[test]
    fn test_settlement_splits_charge() {
        let calc = FeeCalculator::standard();
        let s = calc.settlement(1000);
        assert_eq!(s.total_cents, 1076);
        assert_eq!(s.seller_amount_cents, 1000);
        assert_eq!(s.application_fee_cents, 76);
        assert_eq!(s.processor_fee_cents, 40);
        assert_eq!(s.platform_net_cents, 36);
        assert_eq!(s.rounding_slack_cents, 1);
    }

    #[test]
    fn test_settlement_non_positive_price_is_empty() {
        let calc = FeeCalculator::standard();
        assert_eq!(calc.settlement(0), Settlement::default());
        assert_eq!(calc.settlement(-10), Settlement::default());
    }

    #[test]
    fn test_seller_protected_for_small_prices() {
        let calc = FeeCalculator::standard();
        for price in 1..=5_000 {
            let s = calc.settlement(price);
            assert!(
                s.rounding_slack_cents >= -1,
                "price {price}: slack {}",
                s.rounding_slack_cents
            );
            assert!(s.total_cents > price);
        }
    }

    #[test]
    fn test_breakdown_serializes_snake_case() {
        let json = serde_json::to_string(&FeeCalculator::standard().breakdown(100)).unwrap();
        assert_eq!(
            json,
            r#"{"subtotal_cents":100,"platform_fee_cents":4,"total_cents":131}"#
        );
    }
}
