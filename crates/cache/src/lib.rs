//! Cache key derivation for runway
//!
//! - **`hashing`**: lock-file detection and SHA-256 content hashing.
//! - **`keys`**: dependency and binary cache descriptors.
//! - **`store`**: the interface to the external cache service.

pub mod hashing;
pub mod keys;
pub mod store;

pub use hashing::{hash_bytes, hash_file, LockFile, PackageManager};
pub use keys::{CacheKeyBuilder, CacheKeys};
pub use store::{CacheStore, DisabledCacheStore};
