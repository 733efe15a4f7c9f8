//! Shared doubles for the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use property_catalog::cache::{CacheBackend, MemoryCacheBackend};
use property_catalog::catalog::{CacheKeys, PropertyCatalog, PropertyPredicate};
use property_catalog::error::{CacheError, CacheResult, StoreError, StoreResult};
use property_catalog::models::{Listing, NewProperty, Property, PropertyPatch};
use property_catalog::store::{MemoryStore, PropertyStore};
use serde_json::json;
use uuid::Uuid;

pub const TTL: Duration = Duration::from_secs(300);

/// A valid create payload in Pune.
pub fn new_property(external_id: &str, price: f64) -> NewProperty {
    serde_json::from_value(json!({
        "externalId": external_id,
        "title": format!("Flat {}", external_id),
        "type": "Apartment",
        "price": price,
        "state": "Maharashtra",
        "city": "Pune",
        "areaSqFt": 850.0,
        "bedrooms": 2,
        "bathrooms": 1,
        "amenities": ["lift", "parking"],
        "furnished": "Semi",
        "availableFrom": "2025-01-01",
        "listedBy": "Owner",
        "tags": ["metro"],
        "colorTheme": "#aabbcc",
        "rating": 4.2,
        "isVerified": true,
        "listingType": "rent"
    }))
    .unwrap()
}

// == Cache Doubles ==
/// Every call fails, as if the cache server were gone.
pub struct DownCache;

#[async_trait]
impl CacheBackend for DownCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set_with_expiry(&self, _key: &str, _value: &[u8], _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn delete_by_pattern(&self, _pattern: &str) -> CacheResult<usize> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> CacheResult<bool> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    fn name(&self) -> &'static str {
        "down"
    }
}

/// Never answers.
pub struct HangingCache;

#[async_trait]
impl CacheBackend for HangingCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        std::future::pending().await
    }

    async fn set_with_expiry(&self, _key: &str, _value: &[u8], _ttl: Duration) -> CacheResult<()> {
        std::future::pending().await
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        std::future::pending().await
    }

    async fn delete_by_pattern(&self, _pattern: &str) -> CacheResult<usize> {
        std::future::pending().await
    }

    async fn ping(&self) -> CacheResult<bool> {
        std::future::pending().await
    }

    fn name(&self) -> &'static str {
        "hanging"
    }
}

/// Memory backend that logs every mutating call and can be told to fail
/// single-key deletes.
pub struct RecordingCache {
    pub inner: MemoryCacheBackend,
    ops: Mutex<Vec<String>>,
    fail_deletes: AtomicBool,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self {
            inner: MemoryCacheBackend::new(1_000),
            ops: Mutex::new(Vec::new()),
            fail_deletes: AtomicBool::new(false),
        }
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.lock().unwrap().clear();
    }

    fn record(&self, op: String) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl CacheBackend for RecordingCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> CacheResult<()> {
        self.record(format!("set {}", key));
        self.inner.set_with_expiry(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.record(format!("del {}", key));
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(CacheError::Unavailable("delete failed".to_string()));
        }
        self.inner.delete(key).await
    }

    async fn delete_by_pattern(&self, pattern: &str) -> CacheResult<usize> {
        self.record(format!("delp {}", pattern));
        self.inner.delete_by_pattern(pattern).await
    }

    async fn ping(&self) -> CacheResult<bool> {
        self.inner.ping().await
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

// == Store Doubles ==
/// Wraps [`MemoryStore`] and counts read calls.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    reads: AtomicUsize,
}

impl CountingStore {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PropertyStore for CountingStore {
    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<Listing>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Listing>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all().await
    }

    async fn find_by_predicate(&self, predicate: &PropertyPredicate) -> StoreResult<Vec<Listing>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_predicate(predicate).await
    }

    async fn insert(&self, property: Property) -> StoreResult<Listing> {
        self.inner.insert(property).await
    }

    async fn update_by_id(
        &self,
        id: &Uuid,
        patch: &PropertyPatch,
    ) -> StoreResult<Option<Listing>> {
        self.inner.update_by_id(id, patch).await
    }

    async fn delete_by_id(&self, id: &Uuid) -> StoreResult<bool> {
        self.inner.delete_by_id(id).await
    }
}

/// Every call fails with a transient error.
pub struct DownStore;

#[async_trait]
impl PropertyStore for DownStore {
    async fn find_by_id(&self, _id: &Uuid) -> StoreResult<Option<Listing>> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn find_all(&self) -> StoreResult<Vec<Listing>> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn find_by_predicate(&self, _predicate: &PropertyPredicate) -> StoreResult<Vec<Listing>> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn insert(&self, _property: Property) -> StoreResult<Listing> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn update_by_id(
        &self,
        _id: &Uuid,
        _patch: &PropertyPatch,
    ) -> StoreResult<Option<Listing>> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    async fn delete_by_id(&self, _id: &Uuid) -> StoreResult<bool> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }
}

/// Never answers.
pub struct HangingStore;

#[async_trait]
impl PropertyStore for HangingStore {
    async fn find_by_id(&self, _id: &Uuid) -> StoreResult<Option<Listing>> {
        std::future::pending().await
    }

    async fn find_all(&self) -> StoreResult<Vec<Listing>> {
        std::future::pending().await
    }

    async fn find_by_predicate(&self, _predicate: &PropertyPredicate) -> StoreResult<Vec<Listing>> {
        std::future::pending().await
    }

    async fn insert(&self, _property: Property) -> StoreResult<Listing> {
        std::future::pending().await
    }

    async fn update_by_id(
        &self,
        _id: &Uuid,
        _patch: &PropertyPatch,
    ) -> StoreResult<Option<Listing>> {
        std::future::pending().await
    }

    async fn delete_by_id(&self, _id: &Uuid) -> StoreResult<bool> {
        std::future::pending().await
    }
}

/// Wraps [`MemoryStore`]; another writer deletes the record right before
/// every update or delete lands.
#[derive(Default)]
pub struct VanishingStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl PropertyStore for VanishingStore {
    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<Listing>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Listing>> {
        self.inner.find_all().await
    }

    async fn find_by_predicate(&self, predicate: &PropertyPredicate) -> StoreResult<Vec<Listing>> {
        self.inner.find_by_predicate(predicate).await
    }

    async fn insert(&self, property: Property) -> StoreResult<Listing> {
        self.inner.insert(property).await
    }

    async fn update_by_id(
        &self,
        id: &Uuid,
        patch: &PropertyPatch,
    ) -> StoreResult<Option<Listing>> {
        self.inner.delete_by_id(id).await?;
        self.inner.update_by_id(id, patch).await
    }

    async fn delete_by_id(&self, id: &Uuid) -> StoreResult<bool> {
        self.inner.delete_by_id(id).await?;
        self.inner.delete_by_id(id).await
    }
}

pub fn catalog_with(
    store: Arc<dyn PropertyStore>,
    cache: Arc<dyn CacheBackend>,
) -> PropertyCatalog {
    PropertyCatalog::new(store, cache, CacheKeys::default(), TTL)
}
