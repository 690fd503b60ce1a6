//! Customer lifecycle
//!
//! Creation resolves the customer's meter and confirms its supplier before
//! anything is written. Updates are partial merges over the stored record.

use ampere_core::{
    models::{Customer, CustomerPatch, MeterSelection},
    traits::{CustomerRepository, MeterRepository, SupplierRepository},
    AppError, AppResult,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::meter_resolver::MeterResolver;

/// Input for registering a customer
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub customer_name: String,
    pub customer_address: String,
    pub connection_date: NaiveDate,
    pub meter: MeterSelection,
    pub supplier_id: i64,
    pub email: Option<String>,
    /// Opening meter index, zero when omitted
    pub current_reading: Option<i32>,
}

/// Customer operations over the three record stores
pub struct CustomerService<C, M, S>
where
    C: CustomerRepository,
    M: MeterRepository,
    S: SupplierRepository,
{
    customers: Arc<C>,
    suppliers: Arc<S>,
    resolver: MeterResolver<M>,
}

impl<C, M, S> CustomerService<C, M, S>
where
    C: CustomerRepository,
    M: MeterRepository,
    S: SupplierRepository,
{
    /// Create a new customer service
    pub fn new(
        customers: Arc<C>,
        meters: Arc<M>,
        suppliers: Arc<S>,
        default_minimum_bill_amount: i32,
    ) -> Self {
        Self {
            customers,
            suppliers,
            resolver: MeterResolver::with_default_floor(meters, default_minimum_bill_amount),
        }
    }

    /// Register a customer.
    ///
    /// The supplier is checked before the meter is resolved, so an unknown
    /// supplier never leaves a freshly created meter behind.
    #[instrument(skip(self, input), fields(customer_name = %input.customer_name))]
    pub async fn create(&self, input: NewCustomer) -> AppResult<Customer> {
        let opening_reading = input.current_reading.unwrap_or(0);
        if opening_reading < 0 {
            return Err(AppError::Validation(
                "Current reading must be a non-negative number".to_string(),
            ));
        }

        self.ensure_supplier(input.supplier_id).await?;
        let meter_id = self.resolver.assign(input.meter).await?;

        let now = Utc::now();
        let customer = Customer {
            id: 0,
            customer_name: input.customer_name,
            customer_address: input.customer_address,
            connection_date: input.connection_date,
            last_reading: 0,
            current_reading: opening_reading,
            bill_amount: Decimal::ZERO,
            meter_id,
            supplier_id: input.supplier_id,
            email: input.email,
            created_at: now,
            updated_at: now,
        };

        let created = self.customers.create(&customer).await?;
        info!(
            customer_id = created.id,
            meter_id = created.meter_id,
            supplier_id = created.supplier_id,
            "Customer created"
        );

        Ok(created)
    }

    /// Fetch one customer
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> AppResult<Customer> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or(AppError::CustomerNotFound(id))
    }

    /// Page through customers ordered by id, with the total count
    #[instrument(skip(self))]
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<(Vec<Customer>, i64)> {
        let customers = self.customers.find_all(limit, offset).await?;
        let total = self.customers.count().await?;
        Ok((customers, total))
    }

    /// Merge `patch` into the stored customer
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: CustomerPatch) -> AppResult<Customer> {
        let mut customer = self.get(id).await?;

        if let Some(meter_id) = patch.meter_id {
            self.resolver.assign(MeterSelection::Existing(meter_id)).await?;
        }
        if let Some(supplier_id) = patch.supplier_id {
            self.ensure_supplier(supplier_id).await?;
        }

        patch.apply_to(&mut customer);
        customer.check_readings()?;

        let updated = self.customers.update(&customer).await?;
        info!(customer_id = id, "Customer updated");

        Ok(updated)
    }

    /// Remove a customer; a missing id fails before any write
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id).await?;

        if !self.customers.delete(id).await? {
            return Err(AppError::CustomerNotFound(id));
        }

        info!(customer_id = id, "Customer deleted");
        Ok(())
    }

    /// All customers served by `supplier_id`
    #[instrument(skip(self))]
    pub async fn customers_by_supplier(&self, supplier_id: i64) -> AppResult<Vec<Customer>> {
        self.ensure_supplier(supplier_id).await?;

        let customers = self.customers.find_by_supplier(supplier_id).await?;
        debug!(supplier_id, count = customers.len(), "Loaded supplier customers");

        Ok(customers)
    }

    async fn ensure_supplier(&self, supplier_id: i64) -> AppResult<()> {
        if self.suppliers.find_by_id(supplier_id).await?.is_none() {
            warn!(supplier_id, "Unknown supplier referenced");
            return Err(AppError::SupplierNotFound(supplier_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{one_supplier, seeded_meters, MemoryRepo};
    use ampere_core::models::{Meter, Supplier};
    use ampere_core::traits::Repository;

    type Service = CustomerService<MemoryRepo<Customer>, MemoryRepo<Meter>, MemoryRepo<Supplier>>;

    struct Fixture {
        customers: Arc<MemoryRepo<Customer>>,
        meters: Arc<MemoryRepo<Meter>>,
        service: Service,
    }

    async fn fixture() -> Fixture {
        let customers = Arc::new(MemoryRepo::new());
        let meters = Arc::new(seeded_meters().await);
        let suppliers = Arc::new(one_supplier().await);
        let service = CustomerService::new(customers.clone(), meters.clone(), suppliers, 1250);
        Fixture {
            customers,
            meters,
            service,
        }
    }

    fn new_customer(name: &str, meter: MeterSelection) -> NewCustomer {
        NewCustomer {
            customer_name: name.to_string(),
            customer_address: "Test Address".to_string(),
            connection_date: NaiveDate::from_ymd_opt(2023, 9, 9).unwrap(),
            meter,
            supplier_id: 1,
            email: None,
            current_reading: None,
        }
    }

    #[tokio::test]
    async fn test_customers_share_meter_for_same_capacity() {
        let f = fixture().await;

        let first = f
            .service
            .create(new_customer("First", MeterSelection::ByLoadCapacity(6)))
            .await
            .unwrap();
        let second = f
            .service
            .create(new_customer("Second", MeterSelection::ByLoadCapacity(6)))
            .await
            .unwrap();

        assert_eq!(first.meter_id, second.meter_id);
        assert_eq!(f.meters.count().await.unwrap(), 5);
        assert_eq!(f.meters.get(first.meter_id).unwrap().minimum_bill_amount, 1250);
    }

    #[tokio::test]
    async fn test_create_with_seeded_capacity_reuses_seed() {
        let f = fixture().await;

        let customer = f
            .service
            .create(new_customer("Seeded", MeterSelection::ByLoadCapacity(1)))
            .await
            .unwrap();

        assert_eq!(customer.meter_id, 1);
        assert_eq!(customer.current_reading, 0);
        assert_eq!(customer.bill_amount, Decimal::ZERO);
        assert_eq!(f.meters.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_create_with_unknown_supplier_writes_nothing() {
        let f = fixture().await;
        let meter_writes = f.meters.writes();
        let mut input = new_customer("Orphan", MeterSelection::ByLoadCapacity(42));
        input.supplier_id = 9;

        let result = f.service.create(input).await;

        assert!(matches!(result, Err(AppError::SupplierNotFound(9))));
        assert_eq!(f.meters.writes(), meter_writes);
        assert_eq!(f.customers.writes(), 0);
    }

    #[tokio::test]
    async fn test_update_address_only_keeps_other_fields() {
        let f = fixture().await;
        let created = f
            .service
            .create(new_customer("Patchable", MeterSelection::Existing(2)))
            .await
            .unwrap();

        let updated = f
            .service
            .update(
                created.id,
                CustomerPatch {
                    customer_address: Some("Updated Address".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.customer_address, "Updated Address");
        assert_eq!(updated.customer_name, "Patchable");
        assert_eq!(updated.meter_id, 2);
        assert_eq!(updated.supplier_id, 1);
        assert_eq!(updated.current_reading, created.current_reading);
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_not_found() {
        let f = fixture().await;

        let result = f.service.update(77, CustomerPatch::default()).await;

        assert!(matches!(result, Err(AppError::CustomerNotFound(77))));
        assert_eq!(f.customers.writes(), 0);
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_meter() {
        let f = fixture().await;
        let created = f
            .service
            .create(new_customer("Keeper", MeterSelection::Existing(1)))
            .await
            .unwrap();

        let result = f
            .service
            .update(
                created.id,
                CustomerPatch {
                    meter_id: Some(404),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::MeterNotFound(404))));
        assert_eq!(f.customers.get(created.id).unwrap().meter_id, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_customer_does_not_mutate() {
        let f = fixture().await;
        f.service
            .create(new_customer("Stays", MeterSelection::Existing(1)))
            .await
            .unwrap();
        let writes = f.customers.writes();

        assert!(matches!(
            f.service.delete(55).await,
            Err(AppError::CustomerNotFound(55))
        ));
        assert_eq!(f.customers.writes(), writes);
        assert_eq!(f.customers.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_customers_by_supplier() {
        let f = fixture().await;
        f.service
            .create(new_customer("One", MeterSelection::Existing(1)))
            .await
            .unwrap();
        f.service
            .create(new_customer("Two", MeterSelection::Existing(3)))
            .await
            .unwrap();

        let served = f.service.customers_by_supplier(1).await.unwrap();
        assert_eq!(served.len(), 2);

        assert!(matches!(
            f.service.customers_by_supplier(2).await,
            Err(AppError::SupplierNotFound(2))
        ));
    }

    #[tokio::test]
    async fn test_create_then_bill_end_to_end() {
        let f = fixture().await;
        let customer = f
            .service
            .create(new_customer("Test Customer", MeterSelection::ByLoadCapacity(1)))
            .await
            .unwrap();
        let meter = f.meters.get(customer.meter_id).unwrap();
        assert_eq!((meter.load_capacity, meter.minimum_bill_amount), (1, 500));

        let billing = crate::BillingService::new(f.customers.clone(), f.meters.clone());
        let summary = billing.calculate_bill(customer.id, 100).await.unwrap();

        assert_eq!(summary.units_consumed, 100);
        assert_eq!(summary.tiered_amount, Decimal::from(300));
        assert_eq!(summary.bill_amount, Decimal::from(500));

        let stored = f.service.get(customer.id).await.unwrap();
        assert_eq!(stored.last_reading, 0);
        assert_eq!(stored.current_reading, 100);
        assert_eq!(stored.bill_amount, Decimal::from(500));
    }
}
