//! Repository implementations
//!
//! Concrete implementations of the repository traits defined in ampere-core,
//! using sqlx for PostgreSQL access.

pub mod customer_repo;
pub mod meter_repo;
pub mod supplier_repo;

pub use customer_repo::PgCustomerRepository;
pub use meter_repo::PgMeterRepository;
pub use supplier_repo::PgSupplierRepository;

/// SQLSTATE raised when a row is still referenced by a foreign key
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// True when `err` is a foreign key violation
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION)
}
