//! Common traits for repositories and external collaborators
//!
//! The record store and the notification sender are seams: services are
//! generic over these traits, the binary wires in PostgreSQL and HTTP
//! implementations, and tests wire in in-memory doubles.

use crate::error::AppError;
use crate::models::{Customer, Meter, Supplier};
use async_trait::async_trait;
use serde::Serialize;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity, returning it with its assigned identifier
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Customer repository trait with specialized methods
#[async_trait]
pub trait CustomerRepository: Repository<Customer, i64> {
    /// Customers served by a supplier
    async fn find_by_supplier(&self, supplier_id: i64) -> Result<Vec<Customer>, AppError>;
}

/// Meter repository trait with specialized methods
#[async_trait]
pub trait MeterRepository: Repository<Meter, i64> {
    /// Meter registered for a load capacity, lowest identifier first
    async fn find_by_load_capacity(&self, load_capacity: i32) -> Result<Option<Meter>, AppError>;
}

/// Supplier repository trait
pub trait SupplierRepository: Repository<Supplier, i64> {}

/// Outbound message channel
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver a message to `to`
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError>;
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(95, 1, 10);
        assert_eq!(meta.total_pages, 10);

        let meta = PaginationMeta::new(101, 1, 10);
        assert_eq!(meta.total_pages, 11);

        let meta = PaginationMeta::new(0, 1, 0);
        assert_eq!(meta.total_pages, 0);
    }
}
