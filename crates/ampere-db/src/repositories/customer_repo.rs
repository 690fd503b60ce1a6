//! Customer repository implementation
//!
//! Provides PostgreSQL-backed storage for customers. Meter and supplier are
//! stored as foreign keys.

use ampere_core::{
    models::Customer,
    traits::{CustomerRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

use super::is_foreign_key_violation;

const CUSTOMER_COLUMNS: &str = r#"
    id, customer_name, customer_address, connection_date,
    last_reading, current_reading, bill_amount,
    meter_id, supplier_id, email,
    created_at, updated_at
"#;

/// PostgreSQL implementation of CustomerRepository
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Create a new customer repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn write_error(action: &str, entity: &Customer, e: sqlx::Error) -> AppError {
        if is_foreign_key_violation(&e) {
            AppError::Validation(format!(
                "Meter {} or supplier {} does not exist",
                entity.meter_id, entity.supplier_id
            ))
        } else {
            error!("Database error trying to {} customer: {}", action, e);
            AppError::Database(format!("Failed to {} customer: {}", action, e))
        }
    }
}

#[async_trait]
impl Repository<Customer, i64> for PgCustomerRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Customer>> {
        debug!("Finding customer by id: {}", id);

        let query = format!("SELECT {} FROM customers WHERE id = $1", CUSTOMER_COLUMNS);
        let result = sqlx::query_as::<sqlx::Postgres, CustomerRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding customer {}: {}", id, e);
                AppError::Database(format!("Failed to find customer: {}", e))
            })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Customer>> {
        debug!(
            "Finding all customers with limit {} offset {}",
            limit, offset
        );

        let query = format!(
            "SELECT {} FROM customers ORDER BY id LIMIT $1 OFFSET $2",
            CUSTOMER_COLUMNS
        );
        let rows = sqlx::query_as::<sqlx::Postgres, CustomerRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error listing customers: {}", e);
                AppError::Database(format!("Failed to fetch customers: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting customers: {}", e);
                AppError::Database(format!("Failed to count customers: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Customer) -> AppResult<Customer> {
        debug!("Creating customer: {}", entity.customer_name);

        let query = format!(
            r#"
            INSERT INTO customers (
                customer_name, customer_address, connection_date,
                last_reading, current_reading, bill_amount,
                meter_id, supplier_id, email
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, CustomerRow>(&query)
            .bind(&entity.customer_name)
            .bind(&entity.customer_address)
            .bind(entity.connection_date)
            .bind(entity.last_reading)
            .bind(entity.current_reading)
            .bind(entity.bill_amount)
            .bind(entity.meter_id)
            .bind(entity.supplier_id)
            .bind(&entity.email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::write_error("create", entity, e))?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Customer) -> AppResult<Customer> {
        debug!("Updating customer: {}", entity.id);

        let query = format!(
            r#"
            UPDATE customers
            SET customer_name = $2,
                customer_address = $3,
                connection_date = $4,
                last_reading = $5,
                current_reading = $6,
                bill_amount = $7,
                meter_id = $8,
                supplier_id = $9,
                email = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );

        let row = sqlx::query_as::<sqlx::Postgres, CustomerRow>(&query)
            .bind(entity.id)
            .bind(&entity.customer_name)
            .bind(&entity.customer_address)
            .bind(entity.connection_date)
            .bind(entity.last_reading)
            .bind(entity.current_reading)
            .bind(entity.bill_amount)
            .bind(entity.meter_id)
            .bind(entity.supplier_id)
            .bind(&entity.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::write_error("update", entity, e))?;

        row.map(Into::into)
            .ok_or(AppError::CustomerNotFound(entity.id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Deleting customer: {}", id);

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting customer {}: {}", id, e);
                AppError::Database(format!("Failed to delete customer: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    #[instrument(skip(self))]
    async fn find_by_supplier(&self, supplier_id: i64) -> AppResult<Vec<Customer>> {
        debug!("Finding customers for supplier: {}", supplier_id);

        let query = format!(
            "SELECT {} FROM customers WHERE supplier_id = $1 ORDER BY id",
            CUSTOMER_COLUMNS
        );
        let rows = sqlx::query_as::<sqlx::Postgres, CustomerRow>(&query)
            .bind(supplier_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding customers by supplier: {}", e);
                AppError::Database(format!("Failed to fetch customers: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    customer_name: String,
    customer_address: String,
    connection_date: NaiveDate,
    last_reading: i32,
    current_reading: i32,
    bill_amount: Decimal,
    meter_id: i64,
    supplier_id: i64,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            customer_name: row.customer_name,
            customer_address: row.customer_address,
            connection_date: row.connection_date,
            last_reading: row.last_reading,
            current_reading: row.current_reading,
            bill_amount: row.bill_amount,
            meter_id: row.meter_id,
            supplier_id: row.supplier_id,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_keeps_references() {
        let now = Utc::now();
        let customer: Customer = CustomerRow {
            id: 10,
            customer_name: "Test Customer".to_string(),
            customer_address: "Test Address".to_string(),
            connection_date: NaiveDate::from_ymd_opt(2023, 9, 9).unwrap(),
            last_reading: 0,
            current_reading: 100,
            bill_amount: Decimal::from(500),
            meter_id: 1,
            supplier_id: 2,
            email: None,
            created_at: now,
            updated_at: now,
        }
        .into();

        assert_eq!(customer.meter_id, 1);
        assert_eq!(customer.supplier_id, 2);
        assert_eq!(customer.bill_amount, Decimal::from(500));
    }
}
