//! Configuration loader for runway
//!
//! Turns raw [`ActionInputs`] into a validated [`ActionConfig`]. Relative
//! paths are resolved against the base directory once, here, so that no
//! later stage depends on the process working directory.

use crate::config::{ActionConfig, ArtifactSettings, ServerSettings, TestRunOptions};
use crate::inputs::ActionInputs;
use runway_core::{
    Error, Result, DEFAULT_ARTIFACT_DIR, DEFAULT_ARTIFACT_NAME, DEFAULT_ARTIFACT_PATH,
    DEFAULT_WAIT_ON_TIMEOUT_SECS,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration loader that handles all startup configuration
pub struct ConfigLoader {
    inputs: ActionInputs,
    /// Directory relative inputs are resolved against
    base_dir: Option<PathBuf>,
    windows: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(inputs: ActionInputs) -> Self {
        Self {
            inputs,
            base_dir: None,
            windows: cfg!(windows),
        }
    }

    /// Set the directory relative paths are resolved against
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Select platform specific inputs as if running on Windows
    pub fn windows(mut self, windows: bool) -> Self {
        self.windows = windows;
        self
    }

    /// Validate inputs and produce the run configuration
    pub fn load(self) -> Result<ActionConfig> {
        let inputs = &self.inputs;
        let base_dir = match self.base_dir.clone() {
            Some(dir) => dir,
            None => std::env::current_dir()
                .map_err(|e| Error::file_system(".", "resolve current directory", e))?,
        };

        let working_directory = match inputs.get("working-directory") {
            Some(dir) => resolve(&base_dir, Path::new(&dir)),
            None => base_dir,
        };
        tracing::debug!(
            working_directory = %working_directory.display(),
            "resolved working directory"
        );

        let server = ServerSettings {
            build: inputs.get("build"),
            start: self.select_start(),
            wait_on: inputs
                .get("wait-on")
                .map(|raw| parse_wait_on(&raw))
                .transpose()?,
            wait_on_timeout: Duration::from_secs(
                inputs.get_u64("wait-on-timeout", DEFAULT_WAIT_ON_TIMEOUT_SECS)?,
            ),
        };

        let test_options = TestRunOptions {
            command_prefix: inputs.get("command-prefix"),
            headless: inputs.get_bool("headless", false)?,
            record: inputs.get_bool("record", false)?,
            parallel: inputs.get_bool("parallel", false)?,
            group: inputs.get("group"),
            tag: inputs.get("tag"),
            config: inputs.get("config"),
            config_file: inputs.get("config-file"),
            spec: inputs.get("spec"),
            browser: inputs.get("browser"),
            env: inputs.get("env"),
            ci_build_id: inputs.get("ci-build-id"),
        };

        let artifacts = ArtifactSettings {
            enabled: inputs.get_bool("upload-artifacts", true)?,
            path: resolve(
                &working_directory,
                Path::new(
                    &inputs
                        .get("artifact-path")
                        .unwrap_or_else(|| DEFAULT_ARTIFACT_PATH.to_string()),
                ),
            ),
            name: inputs
                .get("artifact-name")
                .unwrap_or_else(|| DEFAULT_ARTIFACT_NAME.to_string()),
            destination: resolve(
                &working_directory,
                Path::new(
                    &inputs
                        .get("artifact-dir")
                        .unwrap_or_else(|| DEFAULT_ARTIFACT_DIR.to_string()),
                ),
            ),
        };

        Ok(ActionConfig {
            cache_key: inputs.get("cache-key"),
            install: inputs.get_bool("install", true)?,
            server,
            run_tests: inputs.get_bool("runTests", true)?,
            command: inputs.get("command"),
            test_options,
            artifacts,
            working_directory,
        })
    }

    fn select_start(&self) -> Option<String> {
        if self.windows {
            if let Some(start) = self.inputs.get("start-windows") {
                return Some(start);
            }
        }
        self.inputs.get("start")
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn parse_wait_on(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| {
        Error::configuration(format!("input 'wait-on' is not a valid URL '{raw}': {e}"))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::configuration(format!(
            "input 'wait-on' must be an http(s) URL, got scheme '{scheme}'"
        ))),
    }
}
