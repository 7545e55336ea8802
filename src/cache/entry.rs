//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Type-erased cached value.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

// == Cache Entry ==
/// A single cached value with its absolute expiry and the cache generation
/// it was computed in.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    value: CachedValue,
    /// When the entry stops being served
    expires_at: Instant,
    /// Cache generation at the time the value was computed
    generation: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry expiring `ttl` from now.
    ///
    /// Returns None if the expiry cannot be represented.
    pub fn new(value: CachedValue, ttl: Duration, generation: u64) -> Option<Self> {
        let expires_at = Instant::now().checked_add(ttl)?;
        Some(Self {
            value,
            expires_at,
            generation,
        })
    }

    /// Returns a shared handle to the stored value.
    pub fn shared_value(&self) -> CachedValue {
        Arc::clone(&self.value)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its expiry.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}
