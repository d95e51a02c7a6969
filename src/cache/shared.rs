use parking_lot::Mutex;

use super::lru::{LruCache, Value};

/// Callback invoked once for every entry evicted for capacity.
///
/// Each call sees the cache with exactly that entry gone: an insert that
/// evicts several entries removes and reports them one at a time.
pub type OnEvicted<V> = Box<dyn Fn(&str, &V) + Send + Sync>;

/// Thread-safe LRU cache shared by all request handlers of a node.
///
/// A single mutex guards the recency list, the index and the byte counter.
/// `get` takes it too, since a hit reorders the list. The eviction callback
/// runs after the lock is released, so it may safely call back into the
/// cache.
pub struct Cache<V> {
    max_bytes: usize,
    inner: Mutex<Option<LruCache<V>>>,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: Value + Clone> Cache<V> {
    /// Creates a cache holding at most `max_bytes` (0 = unbounded).
    ///
    /// The underlying storage is allocated on first insert.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            inner: Mutex::new(None),
            on_evicted: None,
        }
    }

    pub fn with_eviction_callback<F>(max_bytes: usize, on_evicted: F) -> Self
    where
        F: Fn(&str, &V) + Send + Sync + 'static,
    {
        Self {
            max_bytes,
            inner: Mutex::new(None),
            on_evicted: Some(Box::new(on_evicted)),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.inner.lock();
        guard.as_mut()?.get(key).cloned()
    }

    pub fn add(&self, key: impl Into<String>, value: V) {
        self.inner
            .lock()
            .get_or_insert_with(|| LruCache::new(self.max_bytes))
            .put(key, value);

        // The lock is taken again for every eviction and released before
        // its callback.
        while let Some(entry) = self.pop_over_budget() {
            self.notify(entry);
        }
    }

    /// Evicts the least recently used entry. No-op on an empty cache.
    pub fn remove_oldest(&self) {
        let evicted = {
            let mut guard = self.inner.lock();
            guard.as_mut().and_then(|lru| lru.remove_oldest())
        };
        if let Some(entry) = evicted {
            self.notify(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, |lru| lru.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn used_bytes(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, |lru| lru.used_bytes())
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    fn pop_over_budget(&self) -> Option<(String, V)> {
        self.inner.lock().as_mut()?.pop_over_budget()
    }

    fn notify(&self, (key, value): (String, V)) {
        tracing::debug!("Evicted key {} ({} bytes)", key, key.len() + value.len());
        if let Some(callback) = &self.on_evicted {
            callback(&key, &value);
        }
    }
}
