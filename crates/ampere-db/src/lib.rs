//! Ampere Billing Database Layer
//!
//! This crate provides PostgreSQL database access and repository implementations
//! for the Ampere Billing system. It includes:
//!
//! - Connection pool management with sqlx
//! - Embedded schema migrations
//! - Repository implementations for customers, meters and suppliers

pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations};
pub use repositories::*;

// Re-export commonly used types
pub use ampere_core::{AppError, AppResult};
pub use sqlx::PgPool;
