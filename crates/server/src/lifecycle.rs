use crate::readiness::ReadinessProbe;
use runway_config::ServerSettings;
use runway_core::Result;
use runway_task::{BackgroundProcess, CommandExecutor};

/// Build, start and wait for the application under test.
///
/// All three phases are optional and run in that order. Build failures and
/// readiness timeouts are fatal. The started server is never awaited.
#[derive(Debug, Clone)]
pub struct ServerLifecycle {
    settings: ServerSettings,
    probe: ReadinessProbe,
}

impl ServerLifecycle {
    pub fn new(settings: ServerSettings) -> Result<Self> {
        Ok(Self {
            settings,
            probe: ReadinessProbe::new()?,
        })
    }

    pub fn with_probe(settings: ServerSettings, probe: ReadinessProbe) -> Self {
        Self { settings, probe }
    }

    /// Run the configured phases, returning the server handle if one was
    /// started. The caller keeps it only for cleanup.
    pub async fn run(&self, executor: &CommandExecutor) -> Result<Option<BackgroundProcess>> {
        self.build(executor).await?;
        let server = self.start(executor).await?;
        self.wait().await?;
        Ok(server)
    }

    async fn build(&self, executor: &CommandExecutor) -> Result<()> {
        match &self.settings.build {
            Some(build) => {
                tracing::info!(command = %build, "building app");
                executor.run(build, "build").await
            }
            None => Ok(()),
        }
    }

    async fn start(&self, executor: &CommandExecutor) -> Result<Option<BackgroundProcess>> {
        match &self.settings.start {
            Some(start) => {
                tracing::info!(command = %start, "starting server");
                executor.spawn(start, "start").await.map(Some)
            }
            None => Ok(None),
        }
    }

    async fn wait(&self) -> Result<()> {
        match &self.settings.wait_on {
            Some(url) => self
                .probe
                .wait_on(url, self.settings.wait_on_timeout)
                .await
                .map(|_| ()),
            None => Ok(()),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use runway_core::{EnvExports, Error};
    use runway_task::testing::{fake_tools, RecordingProcessRunner};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use url::Url;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings() -> ServerSettings {
        ServerSettings {
            build: None,
            start: None,
            wait_on: None,
            wait_on_timeout: Duration::from_secs(1),
        }
    }

    fn executor(runner: Arc<RecordingProcessRunner>) -> (CommandExecutor, TempDir) {
        let dir = TempDir::new().unwrap();
        let bin = fake_tools(dir.path(), &["npm"]).unwrap();
        let executor =
            CommandExecutor::with_runner(dir.path(), EnvExports::new(), runner).search_path(bin);
        (executor, dir)
    }

    fn lifecycle(settings: ServerSettings) -> ServerLifecycle {
        let probe = ReadinessProbe::new()
            .unwrap()
            .retry_interval(Duration::from_millis(50));
        ServerLifecycle::with_probe(settings, probe)
    }

    #[tokio::test]
    async fn test_nothing_configured_is_a_no_op() {
        let runner = Arc::new(RecordingProcessRunner::new());
        let (executor, _dir) = executor(runner.clone());

        let handle = lifecycle(settings()).run(&executor).await.unwrap();
        assert!(handle.is_none());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_build_then_start_then_wait() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let runner = Arc::new(RecordingProcessRunner::new());
        let (executor, _dir) = executor(runner.clone());
        let settings = ServerSettings {
            build: Some("npm run build".to_string()),
            start: Some("npm start".to_string()),
            wait_on: Some(Url::parse(&server.uri()).unwrap()),
            ..settings()
        };

        let handle = lifecycle(settings).run(&executor).await.unwrap();
        assert_eq!(handle.map(|h| h.label().to_string()).as_deref(), Some("start"));

        let calls = runner.calls();
        assert_eq!(runner.labels(), vec!["build", "start"]);
        assert!(calls[0].spec.wait_for_completion);
        assert_eq!(calls[0].spec.arguments, vec!["run", "build"]);
        assert!(!calls[1].spec.wait_for_completion);
        assert_eq!(calls[1].spec.arguments, vec!["start"]);
    }

    #[tokio::test]
    async fn test_build_failure_stops_before_start() {
        let runner = Arc::new(RecordingProcessRunner::new());
        runner.fail_label("build", 1);
        let (executor, _dir) = executor(runner.clone());
        let settings = ServerSettings {
            build: Some("npm run build".to_string()),
            start: Some("npm start".to_string()),
            ..settings()
        };

        let err = lifecycle(settings).run(&executor).await.unwrap_err();
        assert!(matches!(err, Error::ProcessExit { .. }));
        assert_eq!(runner.labels(), vec!["build"]);
    }

    #[tokio::test]
    async fn test_wait_timeout_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let runner = Arc::new(RecordingProcessRunner::new());
        let (executor, _dir) = executor(runner.clone());
        let settings = ServerSettings {
            start: Some("npm start".to_string()),
            wait_on: Some(Url::parse(&server.uri()).unwrap()),
            wait_on_timeout: Duration::from_millis(300),
            ..settings()
        };

        let err = lifecycle(settings).run(&executor).await.unwrap_err();
        assert!(matches!(err, Error::NetworkTimeout { .. }));
        assert_eq!(runner.labels(), vec!["start"]);
    }
}
