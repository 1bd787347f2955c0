use runway_cache::{CacheKeyBuilder, CacheKeys, CacheStore, LockFile};
use runway_core::{CacheDescriptor, Result, TEST_TOOL, TEST_TOOL_LAUNCHER};
use runway_task::CommandExecutor;
use std::fmt;
use std::sync::Arc;

/// Where the installer is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    Idle,
    CacheLookup,
    Installing,
    /// Binary verified and caches saved
    Verified,
    /// Both caches hit, nothing left to do after install
    Skipped,
    Done,
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstallState::Idle => "idle",
            InstallState::CacheLookup => "cache-lookup",
            InstallState::Installing => "installing",
            InstallState::Verified => "verified",
            InstallState::Skipped => "skipped",
            InstallState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of [`DependencyInstaller::install_maybe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Installation switched off by configuration
    Disabled,
    /// Installed, both caches were already warm
    Skipped(CacheHits),
    /// Installed, verified and saved
    Verified(CacheHits),
}

/// Independent hit/miss for the two cache domains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheHits {
    pub dependencies: bool,
    pub binary: bool,
}

impl CacheHits {
    pub fn all(self) -> bool {
        self.dependencies && self.binary
    }
}

/// Installs dependencies once per run
pub struct DependencyInstaller {
    executor: CommandExecutor,
    store: Arc<dyn CacheStore>,
    keys: CacheKeyBuilder,
    enabled: bool,
    state: InstallState,
}

impl DependencyInstaller {
    pub fn new(executor: CommandExecutor, store: Arc<dyn CacheStore>) -> Self {
        Self {
            executor,
            store,
            keys: CacheKeyBuilder::new(),
            enabled: true,
            state: InstallState::Idle,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn key_builder(mut self, keys: CacheKeyBuilder) -> Self {
        self.keys = keys;
        self
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    fn transition(&mut self, next: InstallState) {
        tracing::debug!(from = %self.state, to = %next, "installer state");
        self.state = next;
    }

    /// Install dependencies unless disabled.
    ///
    /// Install-command failures are fatal. Cache failures are not: a failed
    /// restore counts as a miss and a failed save is only logged.
    pub async fn install_maybe(&mut self) -> Result<InstallOutcome> {
        if !self.enabled {
            tracing::info!("skipping dependency installation");
            self.transition(InstallState::Done);
            return Ok(InstallOutcome::Disabled);
        }

        let lock_file = LockFile::detect(self.executor.working_dir())?;
        let keys = self.keys.build(&lock_file)?;

        self.transition(InstallState::CacheLookup);
        let hits = self.restore_caches(&keys).await;

        self.transition(InstallState::Installing);
        tracing::info!(manager = %lock_file.manager, "installing dependencies");
        self.executor
            .run(lock_file.manager.install_command(), "install")
            .await?;

        let outcome = if hits.all() {
            tracing::info!("dependency and binary caches hit, skipping verify");
            self.transition(InstallState::Skipped);
            InstallOutcome::Skipped(hits)
        } else {
            self.executor
                .run_tool(
                    TEST_TOOL_LAUNCHER,
                    vec![TEST_TOOL.to_string(), "verify".to_string()],
                    "verify",
                )
                .await?;
            self.save_caches(&keys).await;
            self.transition(InstallState::Verified);
            InstallOutcome::Verified(hits)
        };

        self.transition(InstallState::Done);
        Ok(outcome)
    }

    async fn restore_caches(&self, keys: &CacheKeys) -> CacheHits {
        let (dependencies, binary) = tokio::join!(
            restore(self.store.as_ref(), &keys.dependencies),
            restore(self.store.as_ref(), &keys.binary),
        );
        CacheHits {
            dependencies,
            binary,
        }
    }

    async fn save_caches(&self, keys: &CacheKeys) {
        for descriptor in [&keys.dependencies, &keys.binary] {
            if let Err(e) = self.store.save(descriptor).await {
                tracing::warn!(key = %descriptor.primary_key, error = %e, "failed to save cache");
            }
        }
    }
}

async fn restore(store: &dyn CacheStore, descriptor: &CacheDescriptor) -> bool {
    match store.restore(descriptor).await {
        Ok(Some(matched)) => {
            tracing::info!(key = %matched, "cache hit");
            true
        }
        Ok(None) => {
            tracing::info!(key = %descriptor.primary_key, "cache miss");
            false
        }
        Err(e) => {
            tracing::warn!(key = %descriptor.primary_key, error = %e, "cache restore failed");
            false
        }
    }
}
