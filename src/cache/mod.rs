//! In-memory response cache.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::observability::metrics;
use crate::places::Place;

/// A transformed upstream response, shared between the cache and responders.
pub type CachedPlaces = Arc<Vec<Place>>;

/// A thread-safe, bounded LRU cache of transformed responses.
///
/// Keys are the path and query of the incoming request. Both [`get`] and
/// [`put`] count as an access. Entries are only ever dropped by eviction.
///
/// [`get`]: ResponseCache::get
/// [`put`]: ResponseCache::put
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<Mutex<LruCache<String, CachedPlaces>>>,
}

impl ResponseCache {
    /// Create an empty cache holding at most `capacity` responses.
    pub fn new(capacity: NonZeroUsize) -> Self {
        metrics::record_cache_size(0);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Look up a response, marking it most recently used.
    pub fn get(&self, key: &str) -> Option<CachedPlaces> {
        self.lock().get(key).cloned()
    }

    /// Store a response, replacing any previous value for the key and
    /// evicting the least recently used entry when full.
    pub fn put(&self, key: impl Into<String>, places: CachedPlaces) {
        let key = key.into();
        let mut inner = self.lock();
        if let Some((evicted, _)) = inner.push(key.clone(), places) {
            if evicted != key {
                tracing::debug!(key = %evicted, "Evicted least recently used response");
                metrics::record_cache_eviction();
            }
        }
        metrics::record_cache_size(inner.len());
    }

    /// Number of cached responses.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, CachedPlaces>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ResponseCache")
            .field("len", &inner.len())
            .field("capacity", &inner.cap())
            .finish()
    }
}
