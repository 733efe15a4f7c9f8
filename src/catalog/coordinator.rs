//! Cache-aside coordinator
//!
//! [`PropertyCatalog`] sits between callers and the backing store. Reads go
//! through the cache and populate it on a miss; writes commit to the store
//! first and then invalidate every key the write could have made stale.
//!
//! Cache trouble never reaches the caller: a failed or slow cache call is a
//! miss on the read path and a logged warning on the write path. Store
//! trouble always reaches the caller as [`CatalogError::StoreUnavailable`].

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::cache::{CacheBackend, CacheStats};
use crate::catalog::{authorize_owner, CacheKeys, SearchFilter};
use crate::config::Config;
use crate::error::{CacheError, CacheResult, CatalogError, Result, StoreError, StoreResult};
use crate::models::{Listing, NewProperty, Property, PropertyPatch};
use crate::store::PropertyStore;

/// Counters kept by the coordinator, independent of the backend in use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Cache calls that failed or timed out (reads and population)
    pub cache_errors: u64,
    /// Invalidation steps that failed after a committed write
    pub invalidation_failures: u64,
}

impl CatalogStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    cache_errors: AtomicU64,
    invalidation_failures: AtomicU64,
}

fn not_found() -> CatalogError {
    CatalogError::NotFound("Property not found".to_string())
}

// == Property Catalog ==
pub struct PropertyCatalog {
    store: Arc<dyn PropertyStore>,
    cache: Arc<dyn CacheBackend>,
    keys: CacheKeys,
    ttl: Duration,
    store_timeout: Duration,
    cache_timeout: Duration,
    counters: Counters,
}

impl PropertyCatalog {
    /// Creates a coordinator over `store` and `cache`.
    ///
    /// # Arguments
    ///
    /// * `store` - Authoritative record store
    /// * `cache` - Cache backend; may be down at any time
    /// * `keys` - Key scheme for this catalog's namespace
    /// * `ttl` - Expiry applied to every populated entry
    pub fn new(
        store: Arc<dyn PropertyStore>,
        cache: Arc<dyn CacheBackend>,
        keys: CacheKeys,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            keys,
            ttl,
            store_timeout: Duration::from_secs(5),
            cache_timeout: Duration::from_millis(250),
            counters: Counters::default(),
        }
    }

    /// Creates a coordinator with the namespace, TTL and timeouts from `config`.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn PropertyStore>,
        cache: Arc<dyn CacheBackend>,
    ) -> Self {
        Self::new(
            store,
            cache,
            CacheKeys::new(config.cache_namespace.clone()),
            config.cache_ttl(),
        )
        .with_timeouts(config.store_timeout(), config.cache_timeout())
    }

    /// Overrides the per-call timeouts for store and cache calls.
    pub fn with_timeouts(mut self, store_timeout: Duration, cache_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self.cache_timeout = cache_timeout;
        self
    }

    pub fn keys(&self) -> &CacheKeys {
        &self.keys
    }

    pub fn backend_name(&self) -> &'static str {
        self.cache.name()
    }

    // == Read Path ==
    /// Every property.
    pub async fn get_all(&self) -> Result<Vec<Listing>> {
        let key = self.keys.all();
        self.read_through(&key, || self.store.find_all()).await
    }

    /// One property. An unknown id fails with NotFound and leaves no cache entry.
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Listing> {
        let key = self.keys.by_id(id);

        if let Some(listing) = self.cached::<Listing>(&key).await {
            return Ok(listing);
        }

        let listing = self
            .store_call(self.store.find_by_id(id))
            .await?
            .ok_or_else(not_found)?;

        self.populate(&key, &listing).await;
        Ok(listing)
    }

    /// Properties matching every predicate `filter` carries.
    pub async fn search(&self, filter: &SearchFilter) -> Result<Vec<Listing>> {
        let key = self.keys.search(filter);
        let predicate = filter.to_predicate();
        self.read_through(&key, || self.store.find_by_predicate(&predicate))
            .await
    }

    // == Write Path ==
    /// Inserts a new property owned by `actor`.
    pub async fn create(&self, new: NewProperty, actor: &Uuid) -> Result<Listing> {
        if let Some(message) = new.validate() {
            return Err(CatalogError::ValidationFailed(message));
        }

        let property = Property::from_new(new, *actor);
        let listing = self.store_call(self.store.insert(property)).await?;

        debug!(id = %listing.property.id, actor = %actor, "property created");
        self.invalidate(None).await;
        Ok(listing)
    }

    /// Applies `patch` to a property `actor` owns.
    pub async fn update(&self, id: &Uuid, actor: &Uuid, patch: &PropertyPatch) -> Result<Listing> {
        if let Some(message) = patch.validate() {
            return Err(CatalogError::ValidationFailed(message));
        }

        self.load_owned(id, actor).await?;

        let listing = self
            .store_call(self.store.update_by_id(id, patch))
            .await?
            .ok_or_else(not_found)?;

        debug!(id = %id, actor = %actor, "property updated");
        self.invalidate(Some(id)).await;
        Ok(listing)
    }

    /// Deletes a property `actor` owns.
    pub async fn remove(&self, id: &Uuid, actor: &Uuid) -> Result<()> {
        self.load_owned(id, actor).await?;

        if !self.store_call(self.store.delete_by_id(id)).await? {
            return Err(not_found());
        }

        debug!(id = %id, actor = %actor, "property deleted");
        self.invalidate(Some(id)).await;
        Ok(())
    }

    // == Diagnostics ==
    /// True when the cache answers a ping within the cache timeout.
    pub async fn cache_healthy(&self) -> bool {
        matches!(self.cache_call(self.cache.ping()).await, Ok(true))
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            cache_hits: self.counters.hits.load(Ordering::Relaxed),
            cache_misses: self.counters.misses.load(Ordering::Relaxed),
            cache_errors: self.counters.cache_errors.load(Ordering::Relaxed),
            invalidation_failures: self.counters.invalidation_failures.load(Ordering::Relaxed),
        }
    }

    /// Engine counters from the backend, when it keeps them.
    pub async fn engine_stats(&self) -> Option<CacheStats> {
        self.cache.engine_stats().await
    }

    // == Internals ==
    async fn read_through<T, F, Fut>(&self, key: &str, load: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        if let Some(value) = self.cached::<T>(key).await {
            return Ok(value);
        }

        let value = self.store_call(load()).await?;
        self.populate(key, &value).await;
        Ok(value)
    }

    /// Cache lookup. Anything other than a decodable hit counts as a miss.
    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let lookup = self
            .cache_call(self.cache.get(key))
            .await
            .and_then(|hit| decode::<T>(hit.as_deref()));

        match lookup {
            Ok(Some(value)) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "cache hit");
                return Some(value);
            }
            Ok(None) => debug!(key = %key, "cache miss"),
            Err(e @ CacheError::Serialization(_)) => {
                self.counters.cache_errors.fetch_add(1, Ordering::Relaxed);
                warn!(key = %key, error = %e, "discarding undecodable cache entry");
            }
            Err(e) => {
                self.counters.cache_errors.fetch_add(1, Ordering::Relaxed);
                warn!(key = %key, error = %e, "cache read failed, falling back to store");
            }
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Best-effort population; failure is logged and otherwise ignored.
    async fn populate<T: Serialize>(&self, key: &str, value: &T) {
        let written = match serde_json::to_vec(value).map_err(CacheError::from) {
            Ok(bytes) => {
                self.cache_call(self.cache.set_with_expiry(key, &bytes, self.ttl))
                    .await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            self.counters.cache_errors.fetch_add(1, Ordering::Relaxed);
            warn!(key = %key, error = %e, "cache populate failed");
        }
    }

    /// Drops the listing key, the key for `id` when given, then every search
    /// key. Each step runs regardless of the others.
    async fn invalidate(&self, id: Option<&Uuid>) {
        let all = self.keys.all();
        if let Err(e) = self.cache_call(self.cache.delete(&all)).await {
            self.invalidation_failed(&all, e);
        }

        if let Some(id) = id {
            let key = self.keys.by_id(id);
            if let Err(e) = self.cache_call(self.cache.delete(&key)).await {
                self.invalidation_failed(&key, e);
            }
        }

        let pattern = self.keys.search_pattern();
        match self
            .cache_call(self.cache.delete_by_pattern(&pattern))
            .await
        {
            Ok(removed) => debug!(pattern = %pattern, removed, "search entries invalidated"),
            Err(e) => self.invalidation_failed(&pattern, e),
        }
    }

    fn invalidation_failed(&self, key: &str, error: CacheError) {
        self.counters
            .invalidation_failures
            .fetch_add(1, Ordering::Relaxed);
        warn!(key = %key, error = %error, "cache invalidation failed; entry expires with its TTL");
    }

    /// Loads `id` and checks that `actor` created it.
    async fn load_owned(&self, id: &Uuid, actor: &Uuid) -> Result<Listing> {
        let listing = self
            .store_call(self.store.find_by_id(id))
            .await?
            .ok_or_else(not_found)?;

        authorize_owner(actor, &listing.property)?;
        Ok(listing)
    }

    async fn cache_call<T, Fut>(&self, call: Fut) -> CacheResult<T>
    where
        Fut: Future<Output = CacheResult<T>>,
    {
        match timeout(self.cache_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.cache_timeout.as_millis() as u64)),
        }
    }

    async fn store_call<T, Fut>(&self, call: Fut) -> Result<T>
    where
        Fut: Future<Output = StoreResult<T>>,
    {
        let result = match timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.store_timeout.as_millis() as u64)),
        };

        if let Err(e) = &result {
            if !matches!(e, StoreError::Conflict(_)) {
                error!(error = %e, "backing store call failed");
            }
        }
        result.map_err(CatalogError::from)
    }
}

/// Decodes a cached payload; `None` stays a miss.
fn decode<T: DeserializeOwned>(bytes: Option<&[u8]>) -> CacheResult<Option<T>> {
    bytes
        .map(|bytes| serde_json::from_slice(bytes))
        .transpose()
        .map_err(CacheError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheBackend;
    use crate::models::property::fixtures::new_property;
    use crate::store::MemoryStore;

    fn catalog() -> (PropertyCatalog, MemoryCacheBackend) {
        let cache = MemoryCacheBackend::new(100);
        let catalog = PropertyCatalog::new(
            Arc::new(MemoryStore::new()),
            Arc::new(cache.clone()),
            CacheKeys::default(),
            Duration::from_secs(300),
        );
        (catalog, cache)
    }

    #[tokio::test]
    async fn test_get_all_populates_then_hits() {
        let (catalog, cache) = catalog();

        assert!(catalog.get_all().await.unwrap().is_empty());
        assert!(cache.contains_key("properties:all").await);

        catalog.get_all().await.unwrap();
        let stats = catalog.stats();
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_cached() {
        let (catalog, cache) = catalog();
        let id = Uuid::new_v4();

        let result = catalog.get_by_id(&id).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
        assert!(!cache.contains_key(&catalog.keys().by_id(&id)).await);
    }

    #[tokio::test]
    async fn test_create_invalidates_all_and_search() {
        let (catalog, cache) = catalog();
        let actor = Uuid::new_v4();

        catalog.get_all().await.unwrap();
        catalog.search(&SearchFilter::default()).await.unwrap();
        assert_eq!(cache.keys().await.len(), 2);

        catalog.create(new_property("P1", 100.0), &actor).await.unwrap();
        assert!(cache.keys().await.is_empty());

        let all = catalog.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].property.created_by, actor);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_record() {
        let (catalog, _) = catalog();

        let mut new = new_property("P1", 100.0);
        new.title = "  ".to_string();

        let result = catalog.create(new, &Uuid::new_v4()).await;
        assert!(matches!(result, Err(CatalogError::ValidationFailed(_))));
        assert!(catalog.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_by_other_actor_is_forbidden() {
        let (catalog, cache) = catalog();
        let owner = Uuid::new_v4();

        let created = catalog.create(new_property("P1", 100.0), &owner).await.unwrap();
        let id = created.property.id;
        catalog.get_by_id(&id).await.unwrap();

        let patch = PropertyPatch {
            price: Some(1.0),
            ..Default::default()
        };
        let result = catalog.update(&id, &Uuid::new_v4(), &patch).await;

        assert!(matches!(result, Err(CatalogError::Forbidden(_))));
        assert!(cache.contains_key(&catalog.keys().by_id(&id)).await);
        assert_eq!(catalog.get_by_id(&id).await.unwrap().property.price, 100.0);
    }

    #[tokio::test]
    async fn test_remove_drops_by_id_entry() {
        let (catalog, cache) = catalog();
        let owner = Uuid::new_v4();

        let created = catalog.create(new_property("P1", 100.0), &owner).await.unwrap();
        let id = created.property.id;
        catalog.get_by_id(&id).await.unwrap();

        catalog.remove(&id, &owner).await.unwrap();

        assert!(!cache.contains_key(&catalog.keys().by_id(&id)).await);
        assert!(matches!(
            catalog.get_by_id(&id).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_not_found() {
        let (catalog, _) = catalog();
        let result = catalog.remove(&Uuid::new_v4(), &Uuid::new_v4()).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let (catalog, cache) = catalog();

        cache
            .set_with_expiry("properties:all", b"not json", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(catalog.get_all().await.unwrap().is_empty());
        assert_eq!(catalog.stats().cache_errors, 1);
        assert_eq!(catalog.stats().cache_misses, 1);
    }

    #[test]
    fn test_decode_reports_serialization_errors() {
        assert!(matches!(decode::<Vec<Listing>>(None), Ok(None)));
        assert!(matches!(decode::<Vec<Listing>>(Some(b"[]")), Ok(Some(v)) if v.is_empty()));
        assert!(matches!(
            decode::<Vec<Listing>>(Some(b"not json")),
            Err(CacheError::Serialization(_))
        ));
    }

    #[test]
    fn test_hit_rate_without_lookups() {
        assert_eq!(CatalogStats::default().hit_rate(), 0.0);
    }
}
