//! In-memory caching layer fronting the structured store.
//!
//! Uses `moka` for concurrent caching with explicit per-slice invalidation;
//! nothing expires on its own, because the cache must track writes, not time.

pub mod user_data_cache;

pub use user_data_cache::UserDataCache;
