//! Typed configuration for one orchestrator run
//!
//! `ActionConfig` is built once at startup by the [`ConfigLoader`](crate::ConfigLoader)
//! and is immutable afterwards. Every stage of the pipeline reads its own
//! slice of it.

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Immutable configuration for the whole pipeline
#[derive(Debug, Clone)]
pub struct ActionConfig {
    /// Base path for every executed command, fixed at startup
    pub working_directory: PathBuf,

    /// Override for the dependency cache primary key
    pub cache_key: Option<String>,

    /// Whether the dependency installer runs at all
    pub install: bool,

    pub server: ServerSettings,

    /// Whether the test phase runs
    pub run_tests: bool,

    /// Custom test command, bypasses the argument builder when set
    pub command: Option<String>,

    pub test_options: TestRunOptions,

    pub artifacts: ArtifactSettings,
}

/// Build, start and readiness settings for the application under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub build: Option<String>,

    /// Start command already resolved for the host platform
    pub start: Option<String>,

    pub wait_on: Option<Url>,

    pub wait_on_timeout: Duration,
}

/// Where artifacts come from and what the bundle is called
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSettings {
    pub enabled: bool,

    /// Root directory searched for files
    pub path: PathBuf,

    pub name: String,

    /// Destination used by the local uploader
    pub destination: PathBuf,
}

/// Recognized test-runner options, one field per option
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestRunOptions {
    pub command_prefix: Option<String>,
    pub headless: bool,
    pub record: bool,
    pub parallel: bool,
    pub group: Option<String>,
    pub tag: Option<String>,
    pub config: Option<String>,
    pub config_file: Option<String>,
    pub spec: Option<String>,
    pub browser: Option<String>,
    pub env: Option<String>,
    /// Overrides the parallel run identity
    pub ci_build_id: Option<String>,
}

impl TestRunOptions {
    /// Whether a parallel run identity has to be resolved
    pub fn wants_build_id(&self) -> bool {
        self.parallel || self.group.is_some()
    }
}
