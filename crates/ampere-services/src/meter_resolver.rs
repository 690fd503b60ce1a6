//! Meter resolution
//!
//! Customers declare a load capacity; the resolver maps that capacity to the
//! single shared meter registered for it, creating the meter on first use.
//!
//! The lookup and the insert are not atomic. Two concurrent resolutions of
//! the same unseen capacity can both insert, leaving duplicate meters;
//! lookups then always pick the lowest identifier.

use ampere_core::{
    models::{Meter, MeterSelection},
    traits::MeterRepository,
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::constants::DEFAULT_MINIMUM_BILL_AMOUNT;

/// Find-or-create resolver for shared meters
pub struct MeterResolver<M: MeterRepository> {
    meters: Arc<M>,
    default_minimum_bill_amount: i32,
}

impl<M: MeterRepository> MeterResolver<M> {
    /// Create a resolver using the standard floor for new meters
    pub fn new(meters: Arc<M>) -> Self {
        Self::with_default_floor(meters, DEFAULT_MINIMUM_BILL_AMOUNT)
    }

    /// Create a resolver with a custom floor for new meters
    pub fn with_default_floor(meters: Arc<M>, default_minimum_bill_amount: i32) -> Self {
        Self {
            meters,
            default_minimum_bill_amount,
        }
    }

    /// Return the meter for `load_capacity`, creating it when none exists.
    ///
    /// Writes at most one meter and never touches an existing one.
    #[instrument(skip(self))]
    pub async fn resolve(&self, load_capacity: i32) -> AppResult<Meter> {
        if load_capacity < 0 {
            warn!(load_capacity, "Rejected negative load capacity");
            return Err(AppError::Validation(
                "Load capacity must be a non-negative number".to_string(),
            ));
        }

        if let Some(existing) = self.meters.find_by_load_capacity(load_capacity).await? {
            debug!(
                meter_id = existing.id,
                load_capacity, "Reusing existing meter"
            );
            return Ok(existing);
        }

        let created = self
            .meters
            .create(&Meter::new(load_capacity, self.default_minimum_bill_amount))
            .await?;

        info!(
            meter_id = created.id,
            load_capacity,
            minimum_bill_amount = created.minimum_bill_amount,
            "Created meter for new load capacity"
        );

        Ok(created)
    }

    /// Turn a customer's meter selection into a meter identifier.
    ///
    /// An explicit identifier skips resolution but must still exist.
    #[instrument(skip(self))]
    pub async fn assign(&self, selection: MeterSelection) -> AppResult<i64> {
        match selection {
            MeterSelection::Existing(meter_id) => {
                let meter = self
                    .meters
                    .find_by_id(meter_id)
                    .await?
                    .ok_or(AppError::MeterNotFound(meter_id))?;
                Ok(meter.id)
            }
            MeterSelection::ByLoadCapacity(load_capacity) => {
                Ok(self.resolve(load_capacity).await?.id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seeded_meters, MemoryRepo};
    use ampere_core::traits::Repository;

    #[tokio::test]
    async fn test_existing_capacity_is_reused() {
        let meters = Arc::new(seeded_meters().await);
        let writes_before = meters.writes();
        let resolver = MeterResolver::new(meters.clone());

        let meter = resolver.resolve(2).await.unwrap();

        assert_eq!(meter.load_capacity, 2);
        assert_eq!(meter.minimum_bill_amount, 700);
        assert_eq!(meters.writes(), writes_before);
    }

    #[tokio::test]
    async fn test_unseen_capacity_creates_meter_with_default_floor() {
        let meters = Arc::new(seeded_meters().await);
        let resolver = MeterResolver::new(meters.clone());

        let meter = resolver.resolve(7).await.unwrap();

        assert_eq!(meter.load_capacity, 7);
        assert_eq!(meter.minimum_bill_amount, 1250);
        assert_eq!(meters.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let meters = Arc::new(MemoryRepo::<Meter>::new());
        let resolver = MeterResolver::with_default_floor(meters.clone(), 900);

        let first = resolver.resolve(9).await.unwrap();
        let second = resolver.resolve(9).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.minimum_bill_amount, 900);
        assert_eq!(meters.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_explicit_meter_skips_resolution() {
        let meters = Arc::new(seeded_meters().await);
        let resolver = MeterResolver::new(meters.clone());

        assert_eq!(resolver.assign(MeterSelection::Existing(3)).await.unwrap(), 3);
        assert!(matches!(
            resolver.assign(MeterSelection::Existing(99)).await,
            Err(AppError::MeterNotFound(99))
        ));
        assert_eq!(meters.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_negative_capacity_rejected() {
        let meters = Arc::new(MemoryRepo::<Meter>::new());
        let resolver = MeterResolver::new(meters.clone());

        assert!(matches!(
            resolver.resolve(-1).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(meters.writes(), 0);
    }
}
