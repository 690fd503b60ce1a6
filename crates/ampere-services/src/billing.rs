//! Bill calculation
//!
//! Prices the consumption between a customer's stored reading and a newly
//! observed one, applies the floor of the customer's meter and persists the
//! shifted readings together with the new amount.
//!
//! The read-modify-write is not guarded: two concurrent calculations for the
//! same customer race and the last write wins.

use ampere_core::{
    models::{BillSummary, Customer},
    tariff,
    traits::{CustomerRepository, MeterRepository},
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::notification::BillNotifier;

/// Billing calculator backed by the customer and meter stores
pub struct BillingService<C: CustomerRepository, M: MeterRepository> {
    customers: Arc<C>,
    meters: Arc<M>,
}

impl<C: CustomerRepository, M: MeterRepository> BillingService<C, M> {
    /// Create a new billing service
    pub fn new(customers: Arc<C>, meters: Arc<M>) -> Self {
        Self { customers, meters }
    }

    /// Compute and store a new bill for `customer_id`.
    ///
    /// The stored current reading is the previous reading for this bill.
    /// A new reading below it is accepted and yields negative consumption,
    /// which the meter floor then bounds.
    ///
    /// # Errors
    ///
    /// - `Validation` if `current_reading` is negative
    /// - `CustomerNotFound` / `MeterNotFound` if a record does not resolve
    /// - store errors unchanged
    pub async fn calculate_bill(
        &self,
        customer_id: i64,
        current_reading: i32,
    ) -> AppResult<BillSummary> {
        let (_, summary) = self.bill_customer(customer_id, current_reading).await?;
        Ok(summary)
    }

    /// Compute and store a bill, then email it to the customer in the
    /// background.
    ///
    /// Returns the summary and whether a notification was dispatched. The
    /// delivery outcome never affects the stored bill.
    pub async fn calculate_and_notify(
        &self,
        customer_id: i64,
        current_reading: i32,
        notifier: &BillNotifier,
    ) -> AppResult<(BillSummary, bool)> {
        let (customer, summary) = self.bill_customer(customer_id, current_reading).await?;

        let dispatched = notifier.is_enabled()
            && customer
                .email
                .as_deref()
                .is_some_and(|e| !e.trim().is_empty());
        if dispatched {
            notifier.spawn_notify(customer.email, summary.clone());
        }

        Ok((summary, dispatched))
    }

    #[instrument(skip(self))]
    async fn bill_customer(
        &self,
        customer_id: i64,
        current_reading: i32,
    ) -> AppResult<(Customer, BillSummary)> {
        if current_reading < 0 {
            warn!(customer_id, current_reading, "Rejected negative meter reading");
            return Err(AppError::Validation(
                "Current reading must be a non-negative number".to_string(),
            ));
        }

        let mut customer = self
            .customers
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| {
                warn!(customer_id, "Bill requested for unknown customer");
                AppError::CustomerNotFound(customer_id)
            })?;

        let meter = self
            .meters
            .find_by_id(customer.meter_id)
            .await?
            .ok_or(AppError::MeterNotFound(customer.meter_id))?;

        let previous_reading = customer.current_reading;
        let bill = tariff::compute_bill(
            previous_reading,
            current_reading,
            meter.minimum_bill_amount,
        );

        debug!(
            customer_id,
            units_consumed = bill.units_consumed,
            tiered_amount = %bill.tiered_amount,
            minimum_bill_amount = meter.minimum_bill_amount,
            "Tariff applied"
        );

        customer.record_bill(current_reading, bill.final_amount);
        let customer = self.customers.update(&customer).await?;

        info!(
            customer_id,
            previous_reading,
            current_reading,
            bill_amount = %bill.final_amount,
            "Bill calculated"
        );

        let summary = BillSummary {
            customer_id,
            previous_reading,
            current_reading,
            units_consumed: bill.units_consumed,
            tiered_amount: bill.tiered_amount,
            bill_amount: bill.final_amount,
        };

        Ok((customer, summary))
    }
}
