//! Progressive consumption tariff
//!
//! Units are priced tier by tier: each completed tier is charged at its full
//! marginal rate and the remainder at the rate of the tier that contains the
//! total. Consumption at or below the first threshold, negative values
//! included, is priced linearly at the first rate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// One band of the tariff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TariffTier {
    /// Cumulative unit count where this tier ends; `None` for the last tier
    pub upper_bound: Option<i64>,
    /// Price per unit inside this tier
    pub rate: Decimal,
}

/// The residential schedule
pub const STANDARD_TIERS: [TariffTier; 6] = [
    TariffTier { upper_bound: Some(100), rate: dec!(3) },
    TariffTier { upper_bound: Some(200), rate: dec!(5) },
    TariffTier { upper_bound: Some(300), rate: dec!(6) },
    TariffTier { upper_bound: Some(400), rate: dec!(7) },
    TariffTier { upper_bound: Some(500), rate: dec!(7.5) },
    TariffTier { upper_bound: None, rate: dec!(8) },
];

/// Amount owed for `units` before any minimum-bill floor
pub fn tiered_amount(units: i64) -> Decimal {
    let mut amount = Decimal::ZERO;
    let mut lower = 0i64;

    for tier in &STANDARD_TIERS {
        match tier.upper_bound {
            Some(upper) if units > upper => {
                amount += Decimal::from(upper - lower) * tier.rate;
                lower = upper;
            }
            _ => {
                amount += Decimal::from(units - lower) * tier.rate;
                break;
            }
        }
    }

    amount
}

/// Raise `amount` to the meter floor when it falls below it
pub fn apply_floor(amount: Decimal, minimum_bill_amount: i32) -> Decimal {
    let floor = Decimal::from(minimum_bill_amount);
    if floor > amount {
        floor
    } else {
        amount
    }
}

/// Units, tariff amount and floored amount for one reading pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillComputation {
    pub units_consumed: i64,
    pub tiered_amount: Decimal,
    pub final_amount: Decimal,
}

/// Price the move from `previous_reading` to `current_reading`.
///
/// No ordering is enforced between the readings.
pub fn compute_bill(
    previous_reading: i32,
    current_reading: i32,
    minimum_bill_amount: i32,
) -> BillComputation {
    let units_consumed = i64::from(current_reading) - i64::from(previous_reading);
    let tiered = tiered_amount(units_consumed);

    BillComputation {
        units_consumed,
        tiered_amount: tiered,
        final_amount: apply_floor(tiered, minimum_bill_amount),
    }
}
