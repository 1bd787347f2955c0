//! Data model shared across the pipeline stages.
//!
//! None of these values outlive a single run: descriptors are handed to the
//! cache store, command specs to the process runner, manifests to the
//! artifact uploader.

use std::fmt::{self, Display};
use std::ops::Deref;
use std::path::PathBuf;

/// Inputs for one restore/save round-trip against the external cache store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDescriptor {
    /// Directory whose contents are cached
    pub input_path: PathBuf,
    /// Exact key the store saves under and restores first
    pub primary_key: String,
    /// Prefix used for fallback matching when the primary key misses
    pub restore_keys: String,
}

/// A fully resolved command ready to hand to a process runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Absolute path of the executable
    pub tool_path: String,
    pub arguments: Vec<String>,
    pub working_directory: PathBuf,
    /// False for background processes such as the application server
    pub wait_for_completion: bool,
    /// Human readable name used in logs
    pub label: String,
}

impl CommandSpec {
    /// Render the command the way it would be typed, for logging
    pub fn display_line(&self) -> String {
        if self.arguments.is_empty() {
            self.tool_path.clone()
        } else {
            format!("{} {}", self.tool_path, self.arguments.join(" "))
        }
    }
}

/// Identifier grouping sharded test-runner invocations of one CI run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParallelRunId(String);

impl ParallelRunId {
    /// Identity synthesized from the local environment
    pub fn local(workflow_name: &str, commit_sha: &str) -> Self {
        Self(format!("{workflow_name} - {commit_sha}"))
    }

    /// Identity derived from the remote workflow run
    pub fn remote(run_id: &str, total_job_count: u64) -> Self {
        Self(format!("{run_id}-{total_job_count}"))
    }

    /// User supplied identity, used verbatim
    pub fn custom(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ParallelRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for ParallelRunId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Files discovered for upload, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactManifest {
    pub root_directory: PathBuf,
    pub files_to_upload: Vec<PathBuf>,
}

impl ArtifactManifest {
    pub fn is_empty(&self) -> bool {
        self.files_to_upload.is_empty()
    }
}
