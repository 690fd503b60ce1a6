//! Domain models for Ampere Billing

pub mod bill;
pub mod customer;
pub mod meter;
pub mod supplier;

pub use bill::BillSummary;
pub use customer::{Customer, CustomerPatch};
pub use meter::{Meter, MeterSelection, DEFAULT_METERS};
pub use supplier::{Supplier, SupplierType};
