//! Process-wide keyed cache with time-based expiry.
//!
//! There is no eviction policy beyond the TTL. Concurrent misses on the same
//! key may both compute; the later insert wins.

use std::{collections::HashMap, future::Future, hash::Hash, time::Duration};

use parking_lot::RwLock;
use tokio::time::Instant;

#[derive(Debug)]
struct Entry<V> {
    stored_at: Instant,
    value: V,
}

#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: RwLock::new(HashMap::new()) }
    }

    /// Fresh value for `key`, if any. Stale entries are treated as absent.
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write();
        let ttl = self.ttl;
        entries.retain(|_, e| e.stored_at.elapsed() < ttl);
        entries.insert(key, Entry { stored_at: Instant::now(), value });
    }

    /// Return the cached value for `key` or run `compute` and cache its
    /// result. Errors are passed through and never cached.
    pub async fn get_or_try_compute<F, Fut, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }

        let value = compute().await?;
        self.insert(key, value.clone());
        Ok(value)
    }
}
