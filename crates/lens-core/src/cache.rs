//! Process-wide ephemeral cache with per-entry TTL.
//!
//! Memoizes rate-limited external calls (places, events) and whole
//! recognition results. Entries are stored as serialized JSON, so every read
//! hands back a fresh copy and callers can never mutate cached state in
//! place.
//!
//! ## Expiry and bounds
//!
//! - An entry is visible iff `now < expires_at`; expiry is checked lazily on
//!   read and an expired entry is removed by the read that finds it.
//! - The cache holds at most `max_entries` entries. Inserting a new key into
//!   a full cache first drops expired entries, then evicts the entry with the
//!   earliest `expires_at`. An index ordered by `(expires_at, key)` keeps both
//!   steps logarithmic per removed entry.
//!
//! ## Concurrent misses
//!
//! [`EphemeralCache::get_or_try_insert_with`] runs at most one initializer
//! per key at a time. Callers that miss while another caller is already
//! filling the key wait for it and then read its value. A failed
//! initializer stores nothing; the next waiter runs its own.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `LENS_CACHE_MAX_ENTRIES`: Entry bound (default: 10000)

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::defaults;

struct CacheEntry {
    value: serde_json::Value,
    expires_at: DateTime<Utc>,
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    pub evictions: u64,
}

/// Result of [`EphemeralCache::get_or_try_insert_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<T> {
    value: T,
    fresh: bool,
}

impl<T> Lookup<T> {
    /// True when this caller ran the initializer; false when the value came
    /// from the cache, including one filled by a concurrent caller.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Expiry index mirroring `entries`.
    by_expiry: BTreeSet<(DateTime<Utc>, String)>,
    /// Per-key fill locks for in-flight misses.
    inflight: HashMap<String, Arc<Mutex<()>>>,
    stats: CacheStats,
}

impl CacheState {
    fn insert(&mut self, key: &str, entry: CacheEntry) {
        self.remove(key);
        self.by_expiry.insert((entry.expires_at, key.to_string()));
        self.entries.insert(key.to_string(), entry);
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.by_expiry.remove(&(entry.expires_at, key.to_string()));
        Some(entry)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.by_expiry.clear();
    }

    /// Key and expiry of the entry that expires first.
    fn earliest(&self) -> Option<(DateTime<Utc>, String)> {
        self.by_expiry.iter().next().cloned()
    }
}

struct EphemeralCacheInner {
    /// Entries and counters behind one lock so read-check-expire-write is atomic.
    state: Mutex<CacheState>,
    clock: Arc<dyn Clock>,
    max_entries: usize,
    default_ttl: Duration,
}

/// Shared TTL cache. Cloning shares the underlying store.
#[derive(Clone)]
pub struct EphemeralCache {
    inner: Arc<EphemeralCacheInner>,
}

impl EphemeralCache {
    /// Create a cache on the system clock with default bounds.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), defaults::CACHE_MAX_ENTRIES)
    }

    /// Create a cache from environment configuration.
    ///
    /// Reads `LENS_CACHE_MAX_ENTRIES` (default: 10000).
    pub fn from_env() -> Self {
        let max_entries = std::env::var(defaults::ENV_CACHE_MAX_ENTRIES)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults::CACHE_MAX_ENTRIES);
        Self::with_clock(Arc::new(SystemClock), max_entries)
    }

    /// Create a cache driven by an explicit clock.
    pub fn with_clock(clock: Arc<dyn Clock>, max_entries: usize) -> Self {
        Self {
            inner: Arc::new(EphemeralCacheInner {
                state: Mutex::new(CacheState {
                    entries: HashMap::new(),
                    by_expiry: BTreeSet::new(),
                    inflight: HashMap::new(),
                    stats: CacheStats::default(),
                }),
                clock,
                max_entries: max_entries.max(1),
                default_ttl: defaults::CACHE_TTL,
            }),
        }
    }

    /// Get a live entry, removing it if it has expired.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = self.inner.clock.now();
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;

        let expired = match state.entries.get(key) {
            None => {
                state.stats.misses += 1;
                debug!(cache_key = key, "Cache MISS");
                return None;
            }
            Some(entry) => now >= entry.expires_at,
        };

        if expired {
            state.remove(key);
            state.stats.expired += 1;
            state.stats.misses += 1;
            debug!(cache_key = key, "Cache EXPIRED");
            return None;
        }

        let value = state.entries.get(key).map(|e| e.value.clone())?;
        match serde_json::from_value(value) {
            Ok(result) => {
                state.stats.hits += 1;
                debug!(cache_key = key, "Cache HIT");
                Some(result)
            }
            Err(e) => {
                warn!(cache_key = key, error = %e, "Cache entry has unexpected shape");
                state.stats.misses += 1;
                None
            }
        }
    }

    /// Store a value under the default TTL (1 hour).
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
        self.set_with_ttl(key, value, self.inner.default_ttl).await
    }

    /// Store a value, overwriting any existing entry for `key`.
    pub async fn set_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!(cache_key = key, error = %e, "Cache serialization error");
                return false;
            }
        };

        let now = self.inner.clock.now();
        let ttl =
            chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500));
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        if !state.entries.contains_key(key) && state.entries.len() >= self.inner.max_entries {
            Self::make_room(state, now, self.inner.max_entries);
        }
        state.insert(key, CacheEntry { value, expires_at });

        debug!(
            cache_key = key,
            cache_size = state.entries.len(),
            ttl_secs = ttl.num_seconds(),
            "Cache SET"
        );
        true
    }

    /// Remove one entry.
    pub async fn delete(&self, key: &str) -> bool {
        let removed = self.inner.state.lock().await.remove(key).is_some();
        if removed {
            debug!(cache_key = key, "Cache DELETE");
        }
        removed
    }

    /// Remove every entry.
    pub async fn clear(&self) {
        let mut state = self.inner.state.lock().await;
        let count = state.entries.len();
        state.clear();
        debug!(removed = count, "Cache CLEAR");
    }

    /// Number of stored entries, including expired ones not yet read.
    pub async fn len(&self) -> usize {
        self.inner.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.state.lock().await.stats.clone()
    }

    pub fn max_entries(&self) -> usize {
        self.inner.max_entries
    }

    /// Return the live value for `key`, or run `init` and cache its `Ok`
    /// value for `ttl`.
    ///
    /// Concurrent callers missing on the same key are coalesced: one runs
    /// `init` while the rest wait, then read what it stored. Errors are
    /// returned to the caller that produced them and are never cached.
    pub async fn get_or_try_insert_with<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        init: F,
    ) -> std::result::Result<Lookup<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(value) = self.get::<T>(key).await {
            return Ok(Lookup { value, fresh: false });
        }

        let slot = self.join_inflight(key).await;
        let _turn = slot.lock.lock().await;

        if let Some(value) = self.get::<T>(key).await {
            debug!(cache_key = key, "Cache filled by concurrent caller");
            return Ok(Lookup { value, fresh: false });
        }

        let value = init().await?;
        self.set_with_ttl(key, &value, ttl).await;
        Ok(Lookup { value, fresh: true })
    }

    async fn join_inflight(&self, key: &str) -> InflightSlot {
        let mut state = self.inner.state.lock().await;
        // Groups whose last member could not clean up on drop.
        state.inflight.retain(|_, l| Arc::strong_count(l) > 1);
        let lock = state
            .inflight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        InflightSlot {
            cache: Arc::clone(&self.inner),
            key: key.to_string(),
            lock,
        }
    }

    fn make_room(state: &mut CacheState, now: DateTime<Utc>, max_entries: usize) {
        while let Some((expires_at, key)) = state.earliest() {
            let expired = now >= expires_at;
            if !expired && state.entries.len() < max_entries {
                break;
            }
            state.remove(&key);
            if expired {
                state.stats.expired += 1;
            } else {
                state.stats.evictions += 1;
                debug!(cache_key = %key, "Cache EVICT");
            }
        }
    }
}

/// Membership in a key's in-flight group. The last member to leave removes
/// the group, including when its future is dropped mid-fill.
struct InflightSlot {
    cache: Arc<EphemeralCacheInner>,
    key: String,
    lock: Arc<Mutex<()>>,
}

impl Drop for InflightSlot {
    fn drop(&mut self) {
        // Drop cannot await; a contended state lock leaves the group for the
        // next `join_inflight` sweep.
        if let Ok(mut state) = self.cache.state.try_lock() {
            let last = state
                .inflight
                .get(&self.key)
                .map(|l| Arc::ptr_eq(l, &self.lock) && Arc::strong_count(l) == 2)
                .unwrap_or(false);
            if last {
                state.inflight.remove(&self.key);
            }
        }
    }
}

impl Default for EphemeralCache {
    fn default() -> Self {
        Self::new()
    }
}
