//! API layer for Ampere Billing
//!
//! HTTP handlers for customers, meters, suppliers and bill calculation.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    missing_docs
)]

pub mod dto;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

// Re-export handler configuration functions
pub use handlers::{configure_customers, configure_meters, configure_suppliers, health_check};
