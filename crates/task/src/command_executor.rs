use crate::command::{resolve_tool, resolve_tool_in, split_command};
use crate::runner::{BackgroundProcess, ProcessRunner, SystemProcessRunner};
use runway_core::{CommandSpec, EnvExports, Result};
use runway_utils::QuotingPolicy;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Executes command strings in the run's fixed working directory.
///
/// Every command sees the environment exported so far through
/// [`EnvExports`]. Cloning is cheap and clones share the runner and exports.
#[derive(Clone)]
pub struct CommandExecutor {
    working_dir: PathBuf,
    exports: EnvExports,
    runner: Arc<dyn ProcessRunner>,
    quoting: QuotingPolicy,
    search_path: Option<OsString>,
}

impl CommandExecutor {
    /// Executor backed by real processes
    pub fn new(working_dir: impl Into<PathBuf>, exports: EnvExports) -> Self {
        Self::with_runner(working_dir, exports, Arc::new(SystemProcessRunner::new()))
    }

    /// Executor backed by a caller supplied runner
    pub fn with_runner(
        working_dir: impl Into<PathBuf>,
        exports: EnvExports,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            exports,
            runner,
            quoting: QuotingPolicy::host(),
            search_path: None,
        }
    }

    pub fn quoting(mut self, quoting: QuotingPolicy) -> Self {
        self.quoting = quoting;
        self
    }

    /// Resolve tools against `search_path` instead of the process `PATH`
    pub fn search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn quoting_policy(&self) -> QuotingPolicy {
        self.quoting
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn exports(&self) -> &EnvExports {
        &self.exports
    }

    /// Parse and resolve `full_command` without running it
    pub fn prepare(
        &self,
        full_command: &str,
        wait_to_finish: bool,
        label: &str,
    ) -> Result<CommandSpec> {
        let (tool, args) = split_command(full_command)?;
        let args = args.iter().map(|arg| self.quoting.apply(arg)).collect();
        self.prepare_tool(&tool, args, wait_to_finish, label)
    }

    /// Resolve `tool` and pair it with arguments used exactly as given
    pub fn prepare_tool(
        &self,
        tool: &str,
        arguments: Vec<String>,
        wait_to_finish: bool,
        label: &str,
    ) -> Result<CommandSpec> {
        let tool_path = match &self.search_path {
            Some(search_path) => {
                resolve_tool_in(tool, Some(search_path.clone()), &self.working_dir)?
            }
            None => resolve_tool(tool, &self.working_dir)?,
        };
        Ok(CommandSpec {
            tool_path: tool_path.to_string_lossy().into_owned(),
            arguments,
            working_directory: self.working_dir.clone(),
            wait_for_completion: wait_to_finish,
            label: label.to_string(),
        })
    }

    /// Execute `full_command`.
    ///
    /// With `wait_to_finish` the call returns once the process exits and a
    /// non-zero exit is an error. Without it the call returns as soon as the
    /// process is spawned, handing back its handle.
    pub async fn exec(
        &self,
        full_command: &str,
        wait_to_finish: bool,
        label: &str,
    ) -> Result<Option<BackgroundProcess>> {
        let spec = self.prepare(full_command, wait_to_finish, label)?;
        self.execute(spec).await
    }

    /// Run `full_command` to completion
    pub async fn run(&self, full_command: &str, label: &str) -> Result<()> {
        self.exec(full_command, true, label).await.map(|_| ())
    }

    /// Start `full_command` in the background
    pub async fn spawn(&self, full_command: &str, label: &str) -> Result<BackgroundProcess> {
        let spec = self.prepare(full_command, false, label)?;
        tracing::info!(label = %label, command = %spec.display_line(), "starting in background");
        self.runner.spawn(&spec, &self.exports.snapshot())
    }

    /// Run `tool` with pre-built arguments to completion
    pub async fn run_tool(&self, tool: &str, arguments: Vec<String>, label: &str) -> Result<()> {
        let spec = self.prepare_tool(tool, arguments, true, label)?;
        self.execute(spec).await.map(|_| ())
    }

    async fn execute(&self, spec: CommandSpec) -> Result<Option<BackgroundProcess>> {
        let env = self.exports.snapshot();
        if spec.wait_for_completion {
            tracing::info!(label = %spec.label, command = %spec.display_line(), "running");
            self.runner.run(&spec, &env).await?;
            Ok(None)
        } else {
            tracing::info!(
                label = %spec.label,
                command = %spec.display_line(),
                "starting in background"
            );
            self.runner.spawn(&spec, &env).map(Some)
        }
    }
}

impl std::fmt::Debug for CommandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandExecutor")
            .field("working_dir", &self.working_dir)
            .field("exports", &self.exports)
            .field("quoting", &self.quoting)
            .field("search_path", &self.search_path)
            .finish_non_exhaustive()
    }
}
