//! Meter DTOs

use ampere_core::models::Meter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Meter create and update request
///
/// Updates replace both fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MeterRequest {
    /// Electrical load rating
    #[validate(range(min = 0, message = "Load capacity must be a non-negative number"))]
    pub load_capacity: i32,

    /// Bill floor for customers on this meter
    #[validate(range(min = 0, message = "Minimum bill amount must be a non-negative number"))]
    pub minimum_bill_amount: i32,
}

impl MeterRequest {
    /// Convert to an unsaved meter
    pub fn to_meter(&self) -> Meter {
        Meter::new(self.load_capacity, self.minimum_bill_amount)
    }

    /// Overwrite the numeric fields of a stored meter
    pub fn apply_to(&self, meter: &mut Meter) {
        meter.load_capacity = self.load_capacity;
        meter.minimum_bill_amount = self.minimum_bill_amount;
        meter.updated_at = Utc::now();
    }
}

/// Meter response
#[derive(Debug, Clone, Serialize)]
pub struct MeterResponse {
    /// Meter ID
    pub id: i64,
    /// Load capacity
    pub load_capacity: i32,
    /// Bill floor
    pub minimum_bill_amount: i32,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Meter> for MeterResponse {
    fn from(m: Meter) -> Self {
        Self {
            id: m.id,
            load_capacity: m.load_capacity,
            minimum_bill_amount: m.minimum_bill_amount,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
