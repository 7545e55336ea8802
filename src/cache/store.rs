//! TTL Cache Module
//!
//! Generic key -> value memoization with per-entry expiry and bulk
//! invalidation. Values are stored type-erased and recovered with a typed
//! accessor at the call site.
//!
//! Every clear starts a new generation. An entry is only served while its
//! generation is current, so a value computed before a clear can never be
//! served after it, even if it is written afterwards.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::cache::{CacheCounters, CacheEntry, CacheStats, MAX_KEY_LENGTH};

// == TTL Cache ==
/// Concurrent TTL cache. No operation returns an error: anything that cannot
/// be served is a miss.
#[derive(Debug, Default)]
pub struct TtlCache {
    /// Key-value storage
    entries: DashMap<String, CacheEntry>,
    /// Bumped by every clear
    generation: AtomicU64,
    /// Performance statistics
    counters: CacheCounters,
}

impl TtlCache {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Generation ==
    /// Current generation. Capture it before computing a value to cache and
    /// pass it to [`TtlCache::set_if_generation`].
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    // == Get ==
    /// Returns a clone of the value stored under `key`.
    ///
    /// Misses when the key was never set, its entry has expired or predates
    /// the last clear (the entry is evicted), or the stored value is not a `T`.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let current = self.generation();

        // The map guard must be released before any removal on the same shard
        let lookup = self.entries.get(key).map(|entry| {
            let live = !entry.is_expired() && entry.generation() == current;
            live.then(|| (entry.shared_value(), entry.ttl_remaining()))
        });

        let (value, remaining) = match lookup {
            Some(Some(live)) => live,
            Some(None) => {
                let evicted = self
                    .entries
                    .remove_if(key, |_, e| e.is_expired() || e.generation() != current);
                if let Some((_, entry)) = evicted {
                    if entry.is_expired() {
                        self.counters.record_expirations(1);
                    }
                }
                debug!("Cache entry for key {} expired or invalidated", key);
                self.counters.record_miss();
                return None;
            }
            None => {
                debug!("Cache miss for key: {}", key);
                self.counters.record_miss();
                return None;
            }
        };

        match value.downcast_ref::<T>() {
            Some(typed) => {
                debug!("Cache hit for key: {}, {:?} remaining", key, remaining);
                self.counters.record_hit();
                Some(typed.clone())
            }
            None => {
                warn!("Cache entry for key {} has an unexpected type", key);
                self.counters.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key` until `ttl` has elapsed, replacing any
    /// existing entry. Keys that are too long or TTLs that overflow are
    /// silently not cached.
    pub fn set<T>(&self, key: impl Into<String>, value: T, ttl: Duration)
    where
        T: Any + Send + Sync,
    {
        self.insert(key.into(), value, ttl, self.generation());
    }

    // == Set If Generation ==
    /// Like [`TtlCache::set`], but only if no clear has happened since
    /// `generation` was captured. Returns false if the value was dropped.
    pub fn set_if_generation<T>(
        &self,
        key: impl Into<String>,
        value: T,
        ttl: Duration,
        generation: u64,
    ) -> bool
    where
        T: Any + Send + Sync,
    {
        let key = key.into();
        if generation != self.generation() {
            debug!("Dropping stale value for key: {}", key);
            return false;
        }

        // A clear racing past the check leaves this entry on an old
        // generation, so it is never served
        self.insert(key, value, ttl, generation)
    }

    fn insert<T>(&self, key: String, value: T, ttl: Duration, generation: u64) -> bool
    where
        T: Any + Send + Sync,
    {
        if key.len() > MAX_KEY_LENGTH {
            warn!("Not caching key longer than {} bytes", MAX_KEY_LENGTH);
            return false;
        }

        match CacheEntry::new(Arc::new(value), ttl, generation) {
            Some(entry) => {
                debug!("Cache set for key: {}, expires in {:?}", key, ttl);
                self.entries.insert(key, entry);
                true
            }
            None => {
                warn!("Not caching key {}: TTL {:?} out of range", key, ttl);
                false
            }
        }
    }

    // == Remove ==
    /// Evicts a single entry. Returns true if one was present.
    pub fn remove(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        debug!("Cache removed for key: {}", key);
        removed
    }

    // == Clear ==
    /// Invalidates every entry. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        // Bump first so writers that computed before this point are rejected
        self.generation.fetch_add(1, Ordering::SeqCst);
        let count = self.entries.len();
        self.entries.clear();
        self.counters.record_clear();
        info!("Cache cleared ({} entries)", count);
        count
    }

    // == Purge Expired ==
    /// Removes all expired entries, and any left over from an earlier
    /// generation. Returns the number of expired entries removed.
    pub fn purge_expired(&self) -> usize {
        let current = self.generation();
        let mut expired = 0;
        self.entries.retain(|_, entry| {
            if entry.is_expired() {
                expired += 1;
                return false;
            }
            entry.generation() == current
        });
        self.counters.record_expirations(expired);
        expired
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.entries.len())
    }

    // == Length ==
    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
