//! Ampere Billing Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the Ampere Billing system. It includes:
//!
//! - Domain models (Customer, Meter, Supplier, BillSummary)
//! - The progressive consumption tariff
//! - Repository and notification traits
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod tariff;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
