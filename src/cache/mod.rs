//! In-process result cache with time-to-live expiry.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Cache key: a named query plus its rendered parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: &'static str,
    pub params: String,
}

impl CacheKey {
    pub fn new(query: &'static str, params: impl Into<String>) -> Self {
        Self {
            query,
            params: params.into(),
        }
    }
}

/// Query name for the full PnL table.
pub const PNL_TABLE: &str = "pnl_table";

#[derive(Debug)]
struct Entry<V> {
    value: Arc<V>,
    inserted_at: Instant,
}

/// Map from key to shared value; entries older than `ttl` are treated as absent.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + std::fmt::Debug,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, if any.
    pub async fn get(&self, key: &K) -> Option<Arc<V>> {
        self.get_at(key, Instant::now()).await
    }

    /// Fresh value for `key` as observed at `now`.
    pub async fn get_at(&self, key: &K, now: Instant) -> Option<Arc<V>> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if now.saturating_duration_since(entry.inserted_at) < self.ttl {
            Some(entry.value.clone())
        } else {
            debug!(?key, "Cache entry expired");
            None
        }
    }

    /// Store `value`, replacing any previous entry, and return the shared handle.
    pub async fn insert(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        let entry = Entry {
            value: value.clone(),
            inserted_at: Instant::now(),
        };
        self.entries.write().await.insert(key, entry);
        value
    }

    /// Drop the entry for `key`. Returns whether one was present.
    pub async fn invalidate(&self, key: &K) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
