//! Test double for [`ProcessRunner`]
//!
//! Records every command instead of running it. Failures can be scripted by
//! label so pipeline tests can exercise error paths without real tools.

use crate::runner::{BackgroundProcess, ProcessRunner};
use async_trait::async_trait;
use parking_lot::Mutex;
use runway_core::{CommandSpec, Error, Result};
use std::collections::HashMap;

/// One recorded invocation
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub spec: CommandSpec,
    pub env: Vec<(String, String)>,
}

#[derive(Debug, Default)]
pub struct RecordingProcessRunner {
    calls: Mutex<Vec<RecordedCall>>,
    failures: Mutex<HashMap<String, i32>>,
}

impl RecordingProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every command with `label` exit with `exit_code`
    pub fn fail_label(&self, label: &str, exit_code: i32) {
        self.failures.lock().insert(label.to_string(), exit_code);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Labels in invocation order
    pub fn labels(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|call| call.spec.label.clone())
            .collect()
    }

    pub fn count_label(&self, label: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.spec.label == label)
            .count()
    }

    fn record(&self, spec: &CommandSpec, env: &[(String, String)]) -> Result<()> {
        self.calls.lock().push(RecordedCall {
            spec: spec.clone(),
            env: env.to_vec(),
        });

        match self.failures.lock().get(&spec.label) {
            Some(&code) => Err(Error::process_exit(
                spec.tool_path.clone(),
                spec.arguments.clone(),
                Some(code),
            )),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProcessRunner for RecordingProcessRunner {
    async fn run(&self, spec: &CommandSpec, env: &[(String, String)]) -> Result<()> {
        self.record(spec, env)
    }

    fn spawn(&self, spec: &CommandSpec, env: &[(String, String)]) -> Result<BackgroundProcess> {
        self.record(spec, env)?;
        Ok(BackgroundProcess::detached(spec.label.clone()))
    }
}

/// Directory of executables that all point at `/bin/sh`, for use as an
/// executor search path. The recording runner never starts them; they only
/// have to resolve.
#[cfg(unix)]
pub fn fake_tools(dir: &std::path::Path, tools: &[&str]) -> std::io::Result<std::path::PathBuf> {
    let bin = dir.join("fake-bin");
    std::fs::create_dir_all(&bin)?;
    for tool in tools {
        let link = bin.join(tool);
        if !link.exists() {
            std::os::unix::fs::symlink("/bin/sh", link)?;
        }
    }
    Ok(bin)
}
