//! Bill summary model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a bill calculation for one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSummary {
    pub customer_id: i64,

    /// Stored reading before this calculation
    pub previous_reading: i32,

    /// Reading supplied to this calculation
    pub current_reading: i32,

    /// `current_reading - previous_reading`, may be negative
    pub units_consumed: i64,

    /// Amount from the tariff alone
    pub tiered_amount: Decimal,

    /// Amount after the meter floor
    pub bill_amount: Decimal,
}

impl BillSummary {
    /// True when the meter floor replaced the tiered amount
    pub fn floor_applied(&self) -> bool {
        self.bill_amount != self.tiered_amount
    }
}

impl fmt::Display for BillSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "the previous reading was:{}\ncurrent reading is {}\ntotal bill amount is {}",
            self.previous_reading,
            self.current_reading,
            self.bill_amount.normalize()
        )
    }
}
