//! Cache Module
//!
//! Provides a generic in-memory cache with TTL expiration and bulk invalidation.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, CachedValue};
pub use stats::{CacheCounters, CacheStats};
pub use store::TtlCache;

// == Public Constants ==
/// Maximum cache key length in bytes; longer keys are never cached
pub const MAX_KEY_LENGTH: usize = 1024;
