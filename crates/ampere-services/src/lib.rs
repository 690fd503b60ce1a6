//! Business logic services for Ampere Billing
//!
//! Services are generic over the repository traits from `ampere-core`, so the
//! same logic runs against PostgreSQL in production and in-memory doubles in
//! tests.
//!
//! # Services
//!
//! - `MeterResolver` - find-or-create the canonical meter for a load capacity
//! - `BillingService` - tiered bill calculation with the meter floor
//! - `CustomerService` - customer lifecycle and partial-merge updates
//! - `seed_default_meters` - idempotent meter bootstrap
//! - `EmailNotifier` / `BillNotifier` - best-effort bill emails

pub mod billing;
pub mod bootstrap;
pub mod customer_service;
pub mod meter_resolver;
pub mod notification;

#[cfg(test)]
pub(crate) mod test_support;

pub use billing::BillingService;
pub use bootstrap::seed_default_meters;
pub use customer_service::{CustomerService, NewCustomer};
pub use meter_resolver::MeterResolver;
pub use notification::{BillNotifier, EmailNotifier};

/// Business logic constants
pub mod constants {
    /// Floor given to a meter created for an unseen load capacity
    pub const DEFAULT_MINIMUM_BILL_AMOUNT: i32 = 1250;

    /// Subject line of bill notifications
    pub const BILL_EMAIL_SUBJECT: &str = "Electricity Bill";

    /// Prefix of bill notification bodies
    pub const BILL_EMAIL_GREETING: &str = "Dear customer, your electricity bill details: \n";
}
