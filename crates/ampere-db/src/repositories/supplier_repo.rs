//! Supplier repository implementation

use ampere_core::{
    models::{Supplier, SupplierType},
    traits::{Repository, SupplierRepository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

use super::is_foreign_key_violation;

/// PostgreSQL implementation of SupplierRepository
pub struct PgSupplierRepository {
    pool: PgPool,
}

impl PgSupplierRepository {
    /// Create a new supplier repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database supplier type string to enum
    fn parse_supplier_type(s: &str) -> SupplierType {
        SupplierType::from_str(s).unwrap_or_default()
    }
}

#[async_trait]
impl Repository<Supplier, i64> for PgSupplierRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Supplier>> {
        debug!("Finding supplier by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, SupplierRow>(
            r#"
            SELECT id, supplier_name, supplier_type, created_at, updated_at
            FROM suppliers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding supplier {}: {}", id, e);
            AppError::Database(format!("Failed to find supplier: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<sqlx::Postgres, SupplierRow>(
            r#"
            SELECT id, supplier_name, supplier_type, created_at, updated_at
            FROM suppliers
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing suppliers: {}", e);
            AppError::Database(format!("Failed to fetch suppliers: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM suppliers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting suppliers: {}", e);
                AppError::Database(format!("Failed to count suppliers: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Supplier) -> AppResult<Supplier> {
        debug!("Creating supplier: {}", entity.supplier_name);

        let row = sqlx::query_as::<sqlx::Postgres, SupplierRow>(
            r#"
            INSERT INTO suppliers (supplier_name, supplier_type)
            VALUES ($1, $2)
            RETURNING id, supplier_name, supplier_type, created_at, updated_at
            "#,
        )
        .bind(&entity.supplier_name)
        .bind(entity.supplier_type.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating supplier: {}", e);
            AppError::Database(format!("Failed to create supplier: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Supplier) -> AppResult<Supplier> {
        debug!("Updating supplier: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, SupplierRow>(
            r#"
            UPDATE suppliers
            SET supplier_name = $2,
                supplier_type = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, supplier_name, supplier_type, created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.supplier_name)
        .bind(entity.supplier_type.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating supplier {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update supplier: {}", e))
        })?;

        row.map(Into::into)
            .ok_or(AppError::SupplierNotFound(entity.id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Deleting supplier: {}", id);

        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(format!("Supplier {} still serves customers", id))
                } else {
                    error!("Database error deleting supplier {}: {}", id, e);
                    AppError::Database(format!("Failed to delete supplier: {}", e))
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}

impl SupplierRepository for PgSupplierRepository {}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct SupplierRow {
    id: i64,
    supplier_name: String,
    supplier_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Self {
            id: row.id,
            supplier_name: row.supplier_name,
            supplier_type: PgSupplierRepository::parse_supplier_type(&row.supplier_type),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supplier_type() {
        assert_eq!(
            PgSupplierRepository::parse_supplier_type("rural"),
            SupplierType::Rural
        );
        assert_eq!(
            PgSupplierRepository::parse_supplier_type("unknown"),
            SupplierType::Urban
        );
    }
}
