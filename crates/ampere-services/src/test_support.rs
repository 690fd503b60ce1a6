//! In-memory repository doubles shared by the service tests

use ampere_core::{
    models::{Customer, Meter, Supplier, SupplierType},
    traits::{CustomerRepository, MeterRepository, NotificationSender, Repository, SupplierRepository},
    AppError, AppResult,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Records with an identifier the store assigns
pub trait Keyed: Clone + Send + Sync {
    fn key(&self) -> i64;
    fn set_key(&mut self, id: i64);
}

impl Keyed for Customer {
    fn key(&self) -> i64 {
        self.id
    }
    fn set_key(&mut self, id: i64) {
        self.id = id;
    }
}

impl Keyed for Meter {
    fn key(&self) -> i64 {
        self.id
    }
    fn set_key(&mut self, id: i64) {
        self.id = id;
    }
}

impl Keyed for Supplier {
    fn key(&self) -> i64 {
        self.id
    }
    fn set_key(&mut self, id: i64) {
        self.id = id;
    }
}

/// Map-backed store counting every write
pub struct MemoryRepo<T> {
    rows: Mutex<BTreeMap<i64, T>>,
    next_id: Mutex<i64>,
    writes: AtomicUsize,
}

impl<T: Keyed> MemoryRepo<T> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: Mutex::new(1),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of create/update/delete calls that changed state
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn all(&self) -> Vec<T> {
        self.rows.lock().values().cloned().collect()
    }

    pub fn get(&self, id: i64) -> Option<T> {
        self.rows.lock().get(&id).cloned()
    }
}

#[async_trait]
impl<T: Keyed + 'static> Repository<T, i64> for MemoryRepo<T> {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<T>> {
        Ok(self.get(id))
    }

    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<T>> {
        Ok(self
            .all()
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.rows.lock().len() as i64)
    }

    async fn create(&self, entity: &T) -> AppResult<T> {
        let mut next_id = self.next_id.lock();
        let mut row = entity.clone();
        row.set_key(*next_id);
        *next_id += 1;
        self.rows.lock().insert(row.key(), row.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(row)
    }

    async fn update(&self, entity: &T) -> AppResult<T> {
        let mut rows = self.rows.lock();
        if !rows.contains_key(&entity.key()) {
            return Err(AppError::NotFound(format!("row {}", entity.key())));
        }
        rows.insert(entity.key(), entity.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(entity.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let removed = self.rows.lock().remove(&id).is_some();
        if removed {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }
}

#[async_trait]
impl CustomerRepository for MemoryRepo<Customer> {
    async fn find_by_supplier(&self, supplier_id: i64) -> AppResult<Vec<Customer>> {
        Ok(self
            .all()
            .into_iter()
            .filter(|c| c.supplier_id == supplier_id)
            .collect())
    }
}

#[async_trait]
impl MeterRepository for MemoryRepo<Meter> {
    async fn find_by_load_capacity(&self, load_capacity: i32) -> AppResult<Option<Meter>> {
        Ok(self
            .all()
            .into_iter()
            .find(|m| m.load_capacity == load_capacity))
    }
}

impl SupplierRepository for MemoryRepo<Supplier> {}

/// Meter store holding the four default meters (ids 1..=4)
pub async fn seeded_meters() -> MemoryRepo<Meter> {
    let meters = MemoryRepo::new();
    crate::seed_default_meters(&meters)
        .await
        .expect("seeding in-memory meters");
    meters
}

/// Supplier store holding one urban supplier (id 1)
pub async fn one_supplier() -> MemoryRepo<Supplier> {
    let suppliers = MemoryRepo::new();
    suppliers
        .create(&Supplier::new("City Power", SupplierType::Urban))
        .await
        .expect("creating in-memory supplier");
    suppliers
}

/// Notification sender remembering every message
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, String, String)>>,
    pub fail: bool,
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Notification("mail relay down".to_string()));
        }
        self.sent
            .lock()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}
