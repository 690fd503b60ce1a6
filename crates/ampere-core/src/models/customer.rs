//! Customer model
//!
//! A customer is connected through exactly one shared meter and served by
//! exactly one shared supplier. Both are held as identifiers, never as
//! embedded copies.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Customer entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier (assigned by the store)
    pub id: i64,

    /// Customer name
    pub customer_name: String,

    /// Service address
    pub customer_address: String,

    /// Date the connection was established
    pub connection_date: NaiveDate,

    /// Meter index before the most recent bill
    pub last_reading: i32,

    /// Latest meter index
    pub current_reading: i32,

    /// Most recently computed bill
    pub bill_amount: Decimal,

    /// Assigned meter
    pub meter_id: i64,

    /// Serving supplier
    pub supplier_id: i64,

    /// Contact address for bill notifications
    pub email: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Record a freshly computed bill.
    ///
    /// The stored current reading becomes the last reading, and the new
    /// reading and amount replace the current state.
    pub fn record_bill(&mut self, new_reading: i32, amount: Decimal) {
        self.last_reading = self.current_reading;
        self.current_reading = new_reading;
        self.bill_amount = amount;
        self.updated_at = Utc::now();
    }

    /// Check the reading invariants before persisting
    pub fn check_readings(&self) -> AppResult<()> {
        if self.current_reading < 0 {
            return Err(AppError::Validation(
                "Current reading must be a non-negative number".to_string(),
            ));
        }
        if self.last_reading < 0 {
            return Err(AppError::Validation(
                "Last reading must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            id: 0,
            customer_name: String::new(),
            customer_address: String::new(),
            connection_date: Utc::now().date_naive(),
            last_reading: 0,
            current_reading: 0,
            bill_amount: Decimal::ZERO,
            meter_id: 0,
            supplier_id: 0,
            email: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

/// Sparse update for a stored customer.
///
/// Only fields that carry a non-default value overwrite the stored record:
/// `None` never clears a field, and a `current_reading` of zero is treated
/// the same as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub customer_name: Option<String>,
    pub customer_address: Option<String>,
    pub connection_date: Option<NaiveDate>,
    pub current_reading: Option<i32>,
    pub meter_id: Option<i64>,
    pub supplier_id: Option<i64>,
    pub email: Option<String>,
}

impl CustomerPatch {
    /// Merge the supplied fields into `customer`
    pub fn apply_to(&self, customer: &mut Customer) {
        if let Some(reading) = self.current_reading.filter(|r| *r != 0) {
            customer.current_reading = reading;
        }
        if let Some(address) = &self.customer_address {
            customer.customer_address = address.clone();
        }
        if let Some(meter_id) = self.meter_id {
            customer.meter_id = meter_id;
        }
        if let Some(name) = &self.customer_name {
            customer.customer_name = name.clone();
        }
        if let Some(date) = self.connection_date {
            customer.connection_date = date;
        }
        if let Some(supplier_id) = self.supplier_id {
            customer.supplier_id = supplier_id;
        }
        if let Some(email) = &self.email {
            customer.email = Some(email.clone());
        }
        customer.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn stored() -> Customer {
        Customer {
            id: 1,
            customer_name: "Test Customer".to_string(),
            customer_address: "Test Address".to_string(),
            connection_date: NaiveDate::from_ymd_opt(2023, 9, 9).unwrap(),
            current_reading: 40,
            meter_id: 2,
            supplier_id: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_record_bill_shifts_readings() {
        let mut customer = stored();
        customer.record_bill(160, dec!(700));

        assert_eq!(customer.last_reading, 40);
        assert_eq!(customer.current_reading, 160);
        assert_eq!(customer.bill_amount, dec!(700));
    }

    #[test]
    fn test_patch_address_only() {
        let mut customer = stored();
        let before = customer.clone();

        CustomerPatch {
            customer_address: Some("Updated Address".to_string()),
            ..Default::default()
        }
        .apply_to(&mut customer);

        assert_eq!(customer.customer_address, "Updated Address");
        assert_eq!(customer.customer_name, before.customer_name);
        assert_eq!(customer.meter_id, before.meter_id);
        assert_eq!(customer.supplier_id, before.supplier_id);
        assert_eq!(customer.current_reading, before.current_reading);
        assert_eq!(customer.connection_date, before.connection_date);
    }

    #[test]
    fn test_patch_zero_reading_is_ignored() {
        let mut customer = stored();

        CustomerPatch {
            current_reading: Some(0),
            ..Default::default()
        }
        .apply_to(&mut customer);
        assert_eq!(customer.current_reading, 40);

        CustomerPatch {
            current_reading: Some(75),
            meter_id: Some(9),
            ..Default::default()
        }
        .apply_to(&mut customer);
        assert_eq!(customer.current_reading, 75);
        assert_eq!(customer.meter_id, 9);
    }

    #[test]
    fn test_check_readings() {
        let mut customer = stored();
        assert!(customer.check_readings().is_ok());

        customer.current_reading = -1;
        assert!(matches!(
            customer.check_readings(),
            Err(AppError::Validation(_))
        ));
    }
}
