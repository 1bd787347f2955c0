//! The external key/value cache store
//!
//! runway only computes keys; saving and restoring blobs belongs to whatever
//! cache service the CI host provides.

use async_trait::async_trait;
use runway_core::{CacheDescriptor, Result};

/// Restore-by-key and save-by-key against an external cache service
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Restore `descriptor.input_path`, returning the key that matched or
    /// `None` on a miss
    async fn restore(&self, descriptor: &CacheDescriptor) -> Result<Option<String>>;

    /// Save `descriptor.input_path` under `descriptor.primary_key`
    async fn save(&self, descriptor: &CacheDescriptor) -> Result<()>;
}

/// Store used when the host provides no cache service: every restore
/// misses and saves are skipped
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCacheStore;

#[async_trait]
impl CacheStore for DisabledCacheStore {
    async fn restore(&self, descriptor: &CacheDescriptor) -> Result<Option<String>> {
        tracing::debug!(key = %descriptor.primary_key, "cache store disabled, treating as miss");
        Ok(None)
    }

    async fn save(&self, descriptor: &CacheDescriptor) -> Result<()> {
        tracing::debug!(key = %descriptor.primary_key, "cache store disabled, skipping save");
        Ok(())
    }
}
