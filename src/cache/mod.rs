//! Cache Module
//!
//! Cache backends the catalog coordinator reads through: an in-process TTL/LRU
//! engine and a Redis client, both behind the [`CacheBackend`] trait.

mod backend;
mod entry;
mod redis_backend;
mod stats;
mod store;


// Re-export public types
pub use redis_backend::RedisCacheBackend;
pub use backend::{CacheBackend, MemoryCacheBackend};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::{glob_matches, CacheStore};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 1024;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 8 * 1024 * 1024; // 8 MB
