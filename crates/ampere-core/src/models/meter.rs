//! Meter model
//!
//! Meters are shared records bucketing customers by declared load capacity.
//! Each carries a minimum bill floor applied to every bill computed against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Load capacities and floors seeded into an empty meter store
pub const DEFAULT_METERS: [(i32, i32); 4] = [(1, 500), (2, 700), (3, 1000), (4, 1250)];

/// Meter entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meter {
    /// Unique identifier
    pub id: i64,

    /// Electrical load rating
    pub load_capacity: i32,

    /// Lower bound for any bill computed against this meter
    pub minimum_bill_amount: i32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Meter {
    /// Build an unsaved meter
    pub fn new(load_capacity: i32, minimum_bill_amount: i32) -> Self {
        Self {
            id: 0,
            load_capacity,
            minimum_bill_amount,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Both numeric fields must be non-negative
    pub fn validate(&self) -> AppResult<()> {
        if self.load_capacity < 0 {
            return Err(AppError::Validation(
                "Load capacity must be a non-negative number".to_string(),
            ));
        }
        if self.minimum_bill_amount < 0 {
            return Err(AppError::Validation(
                "Minimum bill amount must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a new customer picks its meter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterSelection {
    /// Caller named an existing meter; no resolution happens
    Existing(i64),
    /// Find or create the meter for this load capacity
    ByLoadCapacity(i32),
}
