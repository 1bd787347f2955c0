//! Dependency installation for runway
//!
//! The installer restores the dependency and binary caches, installs with
//! the package manager implied by the lock file, verifies the test-runner
//! binary when either cache missed, and saves both caches afterwards.

pub mod installer;

pub use installer::{CacheHits, DependencyInstaller, InstallOutcome, InstallState};
