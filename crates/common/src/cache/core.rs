//! Core cache implementation
//!
//! A single mutex guards the whole map. Entries are small and every operation
//! is O(1), so serializing unrelated keys is acceptable.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use super::stats::{CacheStats, MetricsCollector};
use crate::resilience::{Clock, SystemClock};

/// Canonical form of a cache key: trimmed of `' '`, `'\r'` and `'\n'` and
/// lowercased.
pub fn normalize_key(key: &str) -> String {
    key.trim_matches(|c| matches!(c, ' ' | '\r' | '\n')).to_lowercase()
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    last_updated: Instant,
}

/// Thread-safe cache with advisory expiry.
///
/// Clones share the same storage.
///
/// # Type Parameters
/// - `V`: Value type (must be `Clone`; fetches hand out copies)
/// - `C`: Clock type for time-based operations (defaults to `SystemClock`)
pub struct TtlCache<V, C = SystemClock>
where
    C: Clock,
{
    entries: Arc<Mutex<HashMap<String, CacheEntry<V>>>>,
    expires_after: Duration,
    metrics: MetricsCollector,
    clock: C,
}

impl<V: Clone> TtlCache<V, SystemClock> {
    /// Create a cache whose entries become old after `expires_after`.
    pub fn new(expires_after: Duration) -> Self {
        Self::with_clock(expires_after, SystemClock)
    }
}

impl<V, C> TtlCache<V, C>
where
    V: Clone,
    C: Clock,
{
    /// Create a cache with a custom clock (useful for testing)
    pub fn with_clock(expires_after: Duration, clock: C) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            expires_after,
            metrics: MetricsCollector::default(),
            clock,
        }
    }

    pub fn expires_after(&self) -> Duration {
        self.expires_after
    }

    /// Insert or overwrite `key`, stamping it with the current time.
    pub fn store(&self, key: &str, value: V) {
        let key = normalize_key(key);
        let now = self.clock.now();
        self.entries.lock().insert(key, CacheEntry { value, last_updated: now });
        self.metrics.record_store();
    }

    /// Copy of the stored value, regardless of age. Does not touch the
    /// entry's timestamp.
    pub fn fetch(&self, key: &str) -> Option<V> {
        let key = normalize_key(key);
        let value = self.entries.lock().get(&key).map(|entry| entry.value.clone());
        self.record_lookup(&key, value.is_some());
        value
    }

    /// `true` when `key` exists and was stored at least `expires_after` ago.
    /// An absent key is never old; pair with [`fetch`](Self::fetch) to tell
    /// absence from freshness.
    pub fn is_old(&self, key: &str) -> bool {
        let key = normalize_key(key);
        let now = self.clock.now();
        self.entries
            .lock()
            .get(&key)
            .is_some_and(|entry| self.is_expired(entry, now))
    }

    /// The stored value only if it exists and is not old, checked under one
    /// lock acquisition.
    pub fn fetch_fresh(&self, key: &str) -> Option<V> {
        let key = normalize_key(key);
        let now = self.clock.now();
        let value = self
            .entries
            .lock()
            .get(&key)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.value.clone());
        self.record_lookup(&key, value.is_some());
        value
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        let key = normalize_key(key);
        self.entries.lock().remove(&key).map(|entry| entry.value)
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
        self.metrics.reset();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len())
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.last_updated) >= self.expires_after
    }

    fn record_lookup(&self, key: &str, hit: bool) {
        if hit {
            debug!(key, "cache hit");
            self.metrics.record_hit();
        } else {
            debug!(key, "cache miss");
            self.metrics.record_miss();
        }
    }
}

impl<V, C> Clone for TtlCache<V, C>
where
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            expires_after: self.expires_after,
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}

impl<V, C: Clock> std::fmt::Debug for TtlCache<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.lock().len())
            .field("expires_after", &self.expires_after)
            .finish()
    }
}
