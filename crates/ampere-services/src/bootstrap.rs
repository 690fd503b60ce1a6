//! Startup seeding

use ampere_core::{
    models::{Meter, DEFAULT_METERS},
    traits::MeterRepository,
    AppResult,
};
use tracing::{debug, info, instrument};

/// Seed the default meters when the meter store is empty.
///
/// Returns the number of meters created; zero when any meter already exists.
/// Run once before the server accepts traffic.
#[instrument(skip(meters))]
pub async fn seed_default_meters<M: MeterRepository + ?Sized>(meters: &M) -> AppResult<usize> {
    let existing = meters.count().await?;
    if existing > 0 {
        debug!(existing, "Meter store already populated, skipping seed");
        return Ok(0);
    }

    for (load_capacity, minimum_bill_amount) in DEFAULT_METERS {
        meters
            .create(&Meter::new(load_capacity, minimum_bill_amount))
            .await?;
    }

    info!(count = DEFAULT_METERS.len(), "Seeded default meters");
    Ok(DEFAULT_METERS.len())
}
