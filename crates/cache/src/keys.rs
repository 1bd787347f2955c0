//! Cache key derivation for the dependency and binary caches
//!
//! Keys are pure functions of the platform, the lock-file hash and the
//! optional user override, so identical inputs produce identical keys on
//! every run.

use crate::hashing::{LockFile, PackageManager};
use runway_core::{CacheDescriptor, Result, TEST_TOOL};
use std::path::PathBuf;

/// Both descriptors used by one installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeys {
    pub dependencies: CacheDescriptor,
    pub binary: CacheDescriptor,
}

/// Builds [`CacheKeys`] for the host platform
#[derive(Debug, Clone)]
pub struct CacheKeyBuilder {
    platform_arch: String,
    override_key: Option<String>,
    binary_dir: PathBuf,
}

impl CacheKeyBuilder {
    pub fn new() -> Self {
        Self {
            platform_arch: runway_utils::platform_arch(),
            override_key: None,
            binary_dir: runway_utils::cypress_cache_dir(),
        }
    }

    pub fn platform_arch(mut self, platform_arch: impl Into<String>) -> Self {
        self.platform_arch = platform_arch.into();
        self
    }

    /// Use `key` verbatim as the dependency cache key
    pub fn override_key(mut self, key: Option<String>) -> Self {
        self.override_key = key;
        self
    }

    pub fn binary_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.binary_dir = dir.into();
        self
    }

    /// Hash the lock file and derive both descriptors
    pub fn build(&self, lock_file: &LockFile) -> Result<CacheKeys> {
        let hash = lock_file.hash()?;
        Ok(self.build_with_hash(lock_file.manager, lock_file.manager.cache_dir(), &hash))
    }

    /// Derive both descriptors from an already computed lock hash
    pub fn build_with_hash(
        &self,
        manager: PackageManager,
        dependency_dir: PathBuf,
        hash: &str,
    ) -> CacheKeys {
        CacheKeys {
            dependencies: dependency_cache(
                manager,
                &self.platform_arch,
                hash,
                self.override_key.as_deref(),
                dependency_dir,
            ),
            binary: binary_cache(TEST_TOOL, &self.platform_arch, hash, self.binary_dir.clone()),
        }
    }
}

impl Default for CacheKeyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Dependency cache: `{manager}-{platformArch}-{hash}` unless overridden.
/// The restore key is always the primary key.
pub fn dependency_cache(
    manager: PackageManager,
    platform_arch: &str,
    hash: &str,
    override_key: Option<&str>,
    input_path: PathBuf,
) -> CacheDescriptor {
    let primary_key = match override_key {
        Some(key) => {
            tracing::info!(key = %key, "using custom cache key");
            key.to_string()
        }
        None => format!("{}-{platform_arch}-{hash}", manager.tool()),
    };

    CacheDescriptor {
        input_path,
        restore_keys: primary_key.clone(),
        primary_key,
    }
}

/// Binary cache: `{tool}-{platformArch}-{hash}`, restoring by the
/// `{tool}-{platformArch}-` prefix so a changed lock file can still reuse
/// the previously downloaded binary.
pub fn binary_cache(
    tool: &str,
    platform_arch: &str,
    hash: &str,
    input_path: PathBuf,
) -> CacheDescriptor {
    let restore_keys = format!("{tool}-{platform_arch}-");
    CacheDescriptor {
        input_path,
        primary_key: format!("{restore_keys}{hash}"),
        restore_keys,
    }
}
