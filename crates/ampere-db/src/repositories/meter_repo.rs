//! Meter repository implementation

use ampere_core::{
    models::Meter,
    traits::{MeterRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

use super::is_foreign_key_violation;

/// PostgreSQL implementation of MeterRepository
pub struct PgMeterRepository {
    pool: PgPool,
}

impl PgMeterRepository {
    /// Create a new meter repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Meter, i64> for PgMeterRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Meter>> {
        debug!("Finding meter by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, MeterRow>(
            r#"
            SELECT id, load_capacity, minimum_bill_amount, created_at, updated_at
            FROM meters
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding meter {}: {}", id, e);
            AppError::Database(format!("Failed to find meter: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Meter>> {
        let rows = sqlx::query_as::<sqlx::Postgres, MeterRow>(
            r#"
            SELECT id, load_capacity, minimum_bill_amount, created_at, updated_at
            FROM meters
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing meters: {}", e);
            AppError::Database(format!("Failed to fetch meters: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM meters")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting meters: {}", e);
                AppError::Database(format!("Failed to count meters: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Meter) -> AppResult<Meter> {
        debug!(
            load_capacity = entity.load_capacity,
            minimum_bill_amount = entity.minimum_bill_amount,
            "Creating meter"
        );

        let row = sqlx::query_as::<sqlx::Postgres, MeterRow>(
            r#"
            INSERT INTO meters (load_capacity, minimum_bill_amount)
            VALUES ($1, $2)
            RETURNING id, load_capacity, minimum_bill_amount, created_at, updated_at
            "#,
        )
        .bind(entity.load_capacity)
        .bind(entity.minimum_bill_amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating meter: {}", e);
            AppError::Database(format!("Failed to create meter: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Meter) -> AppResult<Meter> {
        debug!("Updating meter: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, MeterRow>(
            r#"
            UPDATE meters
            SET load_capacity = $2,
                minimum_bill_amount = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, load_capacity, minimum_bill_amount, created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(entity.load_capacity)
        .bind(entity.minimum_bill_amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating meter {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update meter: {}", e))
        })?;

        row.map(Into::into)
            .ok_or(AppError::MeterNotFound(entity.id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Deleting meter: {}", id);

        let result = sqlx::query("DELETE FROM meters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(format!("Meter {} is still assigned to customers", id))
                } else {
                    error!("Database error deleting meter {}: {}", id, e);
                    AppError::Database(format!("Failed to delete meter: {}", e))
                }
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MeterRepository for PgMeterRepository {
    #[instrument(skip(self))]
    async fn find_by_load_capacity(&self, load_capacity: i32) -> AppResult<Option<Meter>> {
        debug!("Finding meter by load capacity: {}", load_capacity);

        let result = sqlx::query_as::<sqlx::Postgres, MeterRow>(
            r#"
            SELECT id, load_capacity, minimum_bill_amount, created_at, updated_at
            FROM meters
            WHERE load_capacity = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(load_capacity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding meter by load capacity: {}", e);
            AppError::Database(format!("Failed to find meter: {}", e))
        })?;

        Ok(result.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct MeterRow {
    id: i64,
    load_capacity: i32,
    minimum_bill_amount: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MeterRow> for Meter {
    fn from(row: MeterRow) -> Self {
        Self {
            id: row.id,
            load_capacity: row.load_capacity,
            minimum_bill_amount: row.minimum_bill_amount,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
