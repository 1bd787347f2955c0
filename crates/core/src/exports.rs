//! Environment variables exported by the pipeline.
//!
//! Exports are append-only for the life of a run. They are applied to every
//! child process spawned after the export and, when the CI runner hands us a
//! `GITHUB_ENV` file, persisted there for later steps.

use crate::constants::GITHUB_ENV_FILE_VAR;
use crate::errors::{Error, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared handle to the exported environment
#[derive(Debug, Clone, Default)]
pub struct EnvExports {
    vars: Arc<RwLock<IndexMap<String, String>>>,
    env_file: Option<PathBuf>,
}

impl EnvExports {
    /// Exports that stay in-process only
    pub fn new() -> Self {
        Self::default()
    }

    /// Exports that are also appended to the given env file
    pub fn with_env_file(path: impl Into<PathBuf>) -> Self {
        Self {
            vars: Arc::default(),
            env_file: Some(path.into()),
        }
    }

    /// Pick up the CI runner's env file from `GITHUB_ENV` when present
    pub fn from_process_env() -> Self {
        match std::env::var(GITHUB_ENV_FILE_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::with_env_file(path),
            _ => Self::new(),
        }
    }

    /// Record a variable for all subsequently started processes
    pub fn export(&self, name: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        tracing::debug!(name = %name, value = %value, "exporting environment variable");

        if let Some(path) = &self.env_file {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::file_system(path, "open env file", e))?;
            writeln!(file, "{name}={value}")
                .map_err(|e| Error::file_system(path, "append to env file", e))?;
        }

        self.vars.write().insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.vars.read().get(name).cloned()
    }

    /// Snapshot in export order
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.vars
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_exports_are_shared_between_clones() {
        let exports = EnvExports::new();
        let clone = exports.clone();
        clone.export("CI", "1").unwrap();

        assert_eq!(exports.get("CI").as_deref(), Some("1"));
        assert_eq!(exports.len(), 1);
    }

    #[test]
    fn test_snapshot_keeps_export_order() {
        let exports = EnvExports::new();
        exports.export("TERM", "xterm").unwrap();
        exports.export("CI", "1").unwrap();
        exports.export("TERM", "dumb").unwrap();

        assert_eq!(
            exports.snapshot(),
            vec![
                ("TERM".to_string(), "dumb".to_string()),
                ("CI".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_exports_are_appended_to_env_file() {
        let temp_dir = TempDir::new().unwrap();
        let env_file = temp_dir.path().join("github_env");

        let exports = EnvExports::with_env_file(&env_file);
        exports.export("CI", "1").unwrap();
        exports.export("GH_BRANCH", "main").unwrap();

        let content = std::fs::read_to_string(env_file).unwrap();
        assert_eq!(content, "CI=1\nGH_BRANCH=main\n");
    }
}
