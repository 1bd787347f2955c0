//! One orchestrator run.
//!
//! Phases run strictly in order: install, server, tests, artifacts. Every
//! phase failure except artifact upload ends the run on the spot.

use eyre::{Result, WrapErr};
use runway_artifacts::{publish, ArtifactUploader, LocalArtifactUploader};
use runway_cache::{CacheKeyBuilder, CacheStore, DisabledCacheStore};
use runway_config::{ActionConfig, CiEnvironment};
use runway_core::{
    EnvExports, CI_VAR, CYPRESS_CACHE_FOLDER_VAR, TERM_VAR, TEST_TOOL_LAUNCHER,
};
use runway_github::{resolve_parallel_run_id, GithubClient, WorkflowApi};
use runway_install::DependencyInstaller;
use runway_server::ServerLifecycle;
use runway_task::{BackgroundProcess, CommandExecutor};
use runway_testrun::build_test_args;
use runway_utils::tracing::phase_span;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

/// A configured run and its collaborators
pub struct Pipeline {
    config: ActionConfig,
    ci: CiEnvironment,
    executor: CommandExecutor,
    cache_store: Arc<dyn CacheStore>,
    workflow_api: Option<Arc<dyn WorkflowApi>>,
    uploader: Arc<dyn ArtifactUploader>,
    server: ServerLifecycle,
}

/// What a successful run leaves behind
#[derive(Debug)]
pub struct RunOutcome {
    /// Background server, still running
    pub server: Option<BackgroundProcess>,
}

impl Pipeline {
    /// Pipeline wired to real processes, the GitHub API when a token is
    /// available, and the local artifact directory
    pub fn new(config: ActionConfig, ci: CiEnvironment, exports: EnvExports) -> Result<Self> {
        let executor = CommandExecutor::new(&config.working_directory, exports);
        let server = ServerLifecycle::new(config.server.clone())
            .wrap_err("failed to set up readiness probe")?;
        let uploader = Arc::new(LocalArtifactUploader::new(&config.artifacts.destination));

        let workflow_api: Option<Arc<dyn WorkflowApi>> = match GithubClient::from_ci_env(&ci) {
            Some(Ok(client)) => Some(Arc::new(client)),
            Some(Err(e)) => {
                warn!(error = %e, "workflow api unavailable");
                None
            }
            None => None,
        };

        Ok(Self {
            config,
            ci,
            executor,
            cache_store: Arc::new(DisabledCacheStore),
            workflow_api,
            uploader,
            server,
        })
    }

    pub fn with_executor(mut self, executor: CommandExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = store;
        self
    }

    pub fn with_workflow_api(mut self, api: Option<Arc<dyn WorkflowApi>>) -> Self {
        self.workflow_api = api;
        self
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn ArtifactUploader>) -> Self {
        self.uploader = uploader;
        self
    }

    pub fn with_server(mut self, server: ServerLifecycle) -> Self {
        self.server = server;
        self
    }

    pub async fn run(self) -> Result<RunOutcome> {
        self.export_environment()
            .wrap_err("failed to export environment")?;

        self.install()
            .instrument(phase_span("install"))
            .await
            .wrap_err("dependency installation failed")?;

        let server = self
            .server
            .run(&self.executor)
            .instrument(phase_span("server"))
            .await
            .wrap_err("application server failed")?;

        if self.config.run_tests {
            self.run_tests()
                .instrument(phase_span("tests"))
                .await
                .wrap_err("tests failed")?;
        } else {
            info!("runTests is false, skipping tests");
        }

        if self.config.artifacts.enabled {
            self.publish_artifacts()
                .instrument(phase_span("artifacts"))
                .await;
        }

        Ok(RunOutcome { server })
    }

    fn export_environment(&self) -> runway_core::Result<()> {
        let exports = self.executor.exports();
        exports.export(CI_VAR, "1")?;
        exports.export(
            CYPRESS_CACHE_FOLDER_VAR,
            runway_utils::cypress_cache_dir().to_string_lossy(),
        )?;
        exports.export(TERM_VAR, "xterm")?;
        Ok(())
    }

    async fn install(&self) -> runway_core::Result<()> {
        let keys = CacheKeyBuilder::new().override_key(self.config.cache_key.clone());
        let mut installer =
            DependencyInstaller::new(self.executor.clone(), self.cache_store.clone())
                .enabled(self.config.install)
                .key_builder(keys);

        let outcome = installer.install_maybe().await?;
        info!(outcome = ?outcome, "install finished");
        Ok(())
    }

    async fn run_tests(&self) -> runway_core::Result<()> {
        if let Some(command) = &self.config.command {
            info!(command = %command, "running custom test command");
            return self.executor.run(command, "tests").await;
        }

        let options = &self.config.test_options;
        let build_id = if options.wants_build_id() {
            Some(
                resolve_parallel_run_id(
                    &self.ci,
                    self.workflow_api.as_deref(),
                    options.ci_build_id.as_deref(),
                    self.executor.exports(),
                )
                .await,
            )
        } else {
            None
        };

        let args = build_test_args(
            options,
            build_id.as_deref(),
            self.executor.quoting_policy(),
        )?;
        self.executor
            .run_tool(TEST_TOOL_LAUNCHER, args, "tests")
            .await
    }

    async fn publish_artifacts(&self) {
        let settings = &self.config.artifacts;
        match publish(&settings.path, &settings.name, self.uploader.as_ref()).await {
            Ok(report) if !report.is_complete() => {
                warn!(failed = report.failed.len(), "some artifacts were not uploaded");
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "artifact upload failed"),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use runway_config::{ActionInputs, ConfigLoader};
    use runway_task::testing::{fake_tools, RecordingProcessRunner};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        runner: Arc<RecordingProcessRunner>,
        exports: EnvExports,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("yarn.lock"), "# yarn lockfile v1\n").unwrap();
            Self {
                dir,
                runner: Arc::new(RecordingProcessRunner::new()),
                exports: EnvExports::new(),
            }
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn pipeline(&self, inputs: ActionInputs, ci: CiEnvironment) -> Pipeline {
            let config = ConfigLoader::new(inputs)
                .base_dir(self.path())
                .windows(false)
                .load()
                .unwrap();
            let bin = fake_tools(self.path(), &["yarn", "npm", "npx", "make"]).unwrap();
            let executor =
                CommandExecutor::with_runner(self.path(), self.exports.clone(), self.runner.clone())
                    .search_path(bin);

            Pipeline::new(config, ci, self.exports.clone())
                .unwrap()
                .with_executor(executor)
                .with_workflow_api(None)
        }

        fn write_screenshot(&self) {
            let shots = self.path().join("cypress/screenshots");
            fs::create_dir_all(&shots).unwrap();
            fs::write(shots.join("login.png"), b"png").unwrap();
        }

        fn uploaded(&self, name: &str) -> bool {
            self.path()
                .join(".runway/artifacts")
                .join(name)
                .join("login.png")
                .exists()
        }
    }

    fn ci_env() -> CiEnvironment {
        CiEnvironment {
            workflow_name: Some("e2e".to_string()),
            commit_sha: Some("abc123".to_string()),
            run_id: Some("42".to_string()),
            repository: Some("acme/shop".to_string()),
            token: None,
            api_url: "https://api.github.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_phases_run_in_order() {
        let fx = Fixture::new();
        fx.write_screenshot();

        let outcome = fx.pipeline(ActionInputs::new(), ci_env()).run().await.unwrap();

        assert!(outcome.server.is_none());
        assert_eq!(fx.runner.labels(), vec!["install", "verify", "tests"]);
        assert_eq!(fx.exports.get("CI").as_deref(), Some("1"));
        assert_eq!(fx.exports.get("TERM").as_deref(), Some("xterm"));
        assert!(fx.exports.get("CYPRESS_CACHE_FOLDER").is_some());
        assert!(fx.uploaded("cypress-artifacts"));

        let tests = &fx.runner.calls()[2];
        assert!(tests.spec.tool_path.ends_with("npx"));
        assert_eq!(tests.spec.arguments, vec!["cypress", "run"]);
        assert!(tests.env.contains(&("CI".to_string(), "1".to_string())));
    }

    #[tokio::test]
    async fn test_parallel_without_token_uses_local_identity() {
        let fx = Fixture::new();
        let inputs = ActionInputs::new()
            .with("install", "false")
            .with("parallel", "true");

        fx.pipeline(inputs, ci_env()).run().await.unwrap();

        let calls = fx.runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].spec.arguments,
            vec!["cypress", "run", "--parallel", "--ci-build-id", "e2e - abc123"]
        );
    }

    #[tokio::test]
    async fn test_custom_command_bypasses_builder() {
        let fx = Fixture::new();
        let inputs = ActionInputs::new()
            .with("install", "false")
            .with("command", "make e2e")
            .with("record", "true");

        fx.pipeline(inputs, ci_env()).run().await.unwrap();

        let calls = fx.runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].spec.tool_path.ends_with("make"));
        assert_eq!(calls[0].spec.arguments, vec!["e2e"]);
    }

    #[tokio::test]
    async fn test_failed_tests_abort_before_artifacts() {
        let fx = Fixture::new();
        fx.write_screenshot();
        fx.runner.fail_label("tests", 3);

        let inputs = ActionInputs::new()
            .with("install", "false")
            .with("artifact-name", "failure-shots");
        let err = fx.pipeline(inputs, ci_env()).run().await.unwrap_err();

        assert!(format!("{err:#}").contains("tests failed"));
        assert!(!fx.uploaded("failure-shots"));
        assert!(!fx.path().join(".runway/artifacts").exists());
    }

    #[tokio::test]
    async fn test_skipping_tests_and_empty_artifacts_succeeds() {
        let fx = Fixture::new();
        let inputs = ActionInputs::new()
            .with("install", "false")
            .with("runTests", "false");

        fx.pipeline(inputs, ci_env()).run().await.unwrap();

        assert!(fx.runner.calls().is_empty());
        assert!(!fx.path().join(".runway/artifacts/cypress-artifacts").exists());
    }

    #[tokio::test]
    async fn test_build_failure_stops_before_tests() {
        let fx = Fixture::new();
        fx.runner.fail_label("build", 1);
        let inputs = ActionInputs::new()
            .with("install", "false")
            .with("build", "yarn build")
            .with("start", "yarn start");

        let err = fx.pipeline(inputs, ci_env()).run().await.unwrap_err();

        assert!(format!("{err:#}").contains("application server failed"));
        assert_eq!(fx.runner.labels(), vec!["build"]);
    }

    #[tokio::test]
    async fn test_missing_lock_file_is_fatal() {
        let fx = Fixture::new();
        fs::remove_file(fx.path().join("yarn.lock")).unwrap();

        let err = fx.pipeline(ActionInputs::new(), ci_env()).run().await.unwrap_err();

        assert!(format!("{err:#}").contains("dependency installation failed"));
        assert!(fx.runner.calls().is_empty());
    }
}
