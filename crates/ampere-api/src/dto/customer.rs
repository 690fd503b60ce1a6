//! Customer DTOs
//!
//! Request and response types for customer management and billing endpoints.

use ampere_core::models::{BillSummary, Customer, CustomerPatch, MeterSelection};
use ampere_core::AppError;
use ampere_services::NewCustomer;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Customer creation request
///
/// The meter is either named directly with `meter_id` or resolved from
/// `load_capacity`. When both are present the explicit id wins.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerCreateRequest {
    /// Customer name
    #[validate(length(min = 1, max = 100, message = "Customer name must be 1-100 characters"))]
    pub customer_name: String,

    /// Service address
    #[validate(length(min = 1, max = 200, message = "Customer address must be 1-200 characters"))]
    pub customer_address: String,

    /// Connection date (YYYY-MM-DD)
    pub connection_date: NaiveDate,

    /// Declared load capacity used to find or create the meter
    #[validate(range(min = 0, message = "Load capacity must be a non-negative number"))]
    pub load_capacity: Option<i32>,

    /// Existing meter to attach to
    pub meter_id: Option<i64>,

    /// Serving supplier
    pub supplier_id: i64,

    /// Contact address for bill emails
    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,

    /// Opening meter index
    #[validate(range(min = 0, message = "Current reading must be a non-negative number"))]
    pub current_reading: Option<i32>,
}

impl CustomerCreateRequest {
    /// How the new customer's meter is chosen
    ///
    /// # Errors
    ///
    /// `MissingField` when neither `meter_id` nor `load_capacity` is given.
    pub fn meter_selection(&self) -> Result<MeterSelection, AppError> {
        match (self.meter_id, self.load_capacity) {
            (Some(id), _) => Ok(MeterSelection::Existing(id)),
            (None, Some(load_capacity)) => Ok(MeterSelection::ByLoadCapacity(load_capacity)),
            (None, None) => Err(AppError::MissingField(
                "meter_id or load_capacity".to_string(),
            )),
        }
    }

    /// Convert into service input
    ///
    /// # Errors
    ///
    /// Propagates [`Self::meter_selection`] failures.
    pub fn into_new_customer(self) -> Result<NewCustomer, AppError> {
        let meter = self.meter_selection()?;
        Ok(NewCustomer {
            customer_name: self.customer_name,
            customer_address: self.customer_address,
            connection_date: self.connection_date,
            meter,
            supplier_id: self.supplier_id,
            email: self.email,
            current_reading: self.current_reading,
        })
    }
}

/// Customer partial update request
///
/// Absent fields keep their stored value. A `current_reading` of zero is
/// ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CustomerUpdateRequest {
    /// Customer name
    #[validate(length(min = 1, max = 100))]
    pub customer_name: Option<String>,

    /// Service address
    #[validate(length(min = 1, max = 200))]
    pub customer_address: Option<String>,

    /// Connection date
    pub connection_date: Option<NaiveDate>,

    /// Latest meter index
    #[validate(range(min = 0))]
    pub current_reading: Option<i32>,

    /// Meter reference
    pub meter_id: Option<i64>,

    /// Supplier reference
    pub supplier_id: Option<i64>,

    /// Contact address
    #[validate(email)]
    pub email: Option<String>,
}

impl From<CustomerUpdateRequest> for CustomerPatch {
    fn from(req: CustomerUpdateRequest) -> Self {
        Self {
            customer_name: req.customer_name,
            customer_address: req.customer_address,
            connection_date: req.connection_date,
            current_reading: req.current_reading,
            meter_id: req.meter_id,
            supplier_id: req.supplier_id,
            email: req.email,
        }
    }
}

/// Bill calculation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BillRequest {
    /// Newly observed meter index
    #[validate(range(min = 0, message = "Current reading must be a non-negative number"))]
    pub current_reading: i32,
}

/// Customer response
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    /// Customer ID
    pub id: i64,
    /// Customer name
    pub customer_name: String,
    /// Service address
    pub customer_address: String,
    /// Connection date
    pub connection_date: NaiveDate,
    /// Reading before the latest bill
    pub last_reading: i32,
    /// Latest reading
    pub current_reading: i32,
    /// Latest bill
    pub bill_amount: Decimal,
    /// Meter ID
    pub meter_id: i64,
    /// Supplier ID
    pub supplier_id: i64,
    /// Contact address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            customer_name: c.customer_name,
            customer_address: c.customer_address,
            connection_date: c.connection_date,
            last_reading: c.last_reading,
            current_reading: c.current_reading,
            bill_amount: c.bill_amount,
            meter_id: c.meter_id,
            supplier_id: c.supplier_id,
            email: c.email,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Bill calculation response
#[derive(Debug, Clone, Serialize)]
pub struct BillResponse {
    /// Customer ID
    pub customer_id: i64,
    /// Reading the bill started from
    pub previous_reading: i32,
    /// Reading the bill ended at
    pub current_reading: i32,
    /// Units billed, negative when the reading went backwards
    pub units_consumed: i64,
    /// Amount from the tariff alone
    pub tiered_amount: Decimal,
    /// Amount charged
    pub bill_amount: Decimal,
    /// Whether the meter floor replaced the tariff amount
    pub minimum_applied: bool,
    /// Human readable summary, as emailed
    pub details: String,
}

impl From<BillSummary> for BillResponse {
    fn from(s: BillSummary) -> Self {
        Self {
            details: s.to_string(),
            minimum_applied: s.floor_applied(),
            customer_id: s.customer_id,
            previous_reading: s.previous_reading,
            current_reading: s.current_reading,
            units_consumed: s.units_consumed,
            tiered_amount: s.tiered_amount,
            bill_amount: s.bill_amount,
        }
    }
}
