//! The process-execution primitive

use async_trait::async_trait;
use runway_core::{CommandSpec, Error, Result};
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Runs resolved commands
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run to completion; a non-zero exit becomes [`Error::ProcessExit`]
    async fn run(&self, spec: &CommandSpec, env: &[(String, String)]) -> Result<()>;

    /// Start in the background and return as soon as the process exists
    fn spawn(&self, spec: &CommandSpec, env: &[(String, String)]) -> Result<BackgroundProcess>;
}

/// Handle to a process left running for the remainder of the run.
///
/// Dropping the handle does not stop the process.
#[derive(Debug)]
pub struct BackgroundProcess {
    label: String,
    pid: Option<u32>,
    child: Option<Child>,
}

impl BackgroundProcess {
    pub fn from_child(label: impl Into<String>, child: Child) -> Self {
        Self {
            label: label.into(),
            pid: child.id(),
            child: Some(child),
        }
    }

    /// Handle with no underlying process, for runners that only pretend
    pub fn detached(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            pid: None,
            child: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Stop the process if it is still running
    pub async fn kill(&mut self) -> Result<()> {
        if let Some(child) = self.child.as_mut() {
            child
                .kill()
                .await
                .map_err(|e| Error::process_spawn(self.label.clone(), e))?;
        }
        Ok(())
    }
}

/// Production runner backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &CommandSpec, env: &[(String, String)]) -> Command {
        let mut cmd = Command::new(&spec.tool_path);
        configure_args(&mut cmd, &spec.arguments);
        cmd.current_dir(&spec.working_directory)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false);
        cmd
    }
}

// Arguments are already quoted for the Windows console, so they must reach
// the command line untouched.
#[cfg(windows)]
fn configure_args(cmd: &mut Command, args: &[String]) {
    for arg in args {
        cmd.raw_arg(arg);
    }
}

#[cfg(not(windows))]
fn configure_args(cmd: &mut Command, args: &[String]) {
    cmd.args(args);
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, spec: &CommandSpec, env: &[(String, String)]) -> Result<()> {
        let status = Self::command(spec, env)
            .status()
            .await
            .map_err(|e| Error::process_spawn(spec.tool_path.clone(), e))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::process_exit(
                spec.tool_path.clone(),
                spec.arguments.clone(),
                status.code(),
            ))
        }
    }

    fn spawn(&self, spec: &CommandSpec, env: &[(String, String)]) -> Result<BackgroundProcess> {
        let child = Self::command(spec, env)
            .spawn()
            .map_err(|e| Error::process_spawn(spec.tool_path.clone(), e))?;
        tracing::debug!(label = %spec.label, pid = ?child.id(), "spawned background process");
        Ok(BackgroundProcess::from_child(spec.label.clone(), child))
    }
}
