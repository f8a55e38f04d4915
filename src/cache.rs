//! In-process TTL cache.
//!
//! An explicitly owned cache object with a defined key and TTL policy,
//! passed into the client that needs it. Entries are overwritten per key;
//! the only eviction is time-based staleness checked on read.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct StoredEntry<T> {
    value: T,
    expires_at: Instant,
}

/// A mutex-guarded map of string keys to values with per-entry expiry
pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, StoredEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a value with a time-to-live, overwriting any previous entry
    pub fn put(&self, key: &str, value: T, ttl: Duration) {
        let entry = StoredEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(key.to_string(), entry);
    }

    /// Retrieve a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                tracing::debug!(key, "cache hit, entry still fresh");
                Some(entry.value.clone())
            }
            Some(_) => {
                tracing::debug!(key, "cache hit but entry expired");
                entries.remove(key);
                None
            }
            None => {
                tracing::debug!(key, "cache miss");
                None
            }
        }
    }

    /// Manually remove a key from the cache
    pub fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.remove(key);
    }

    /// Number of entries currently stored, expired or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
