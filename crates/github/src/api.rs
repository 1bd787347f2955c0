//! Workflow-run REST API

use async_trait::async_trait;
use runway_config::CiEnvironment;
use runway_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The parts of a workflow run we read
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkflowRun {
    #[serde(default)]
    pub head_branch: Option<String>,
}

/// The job listing of a workflow run
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Read access to the current workflow run
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    async fn get_run(&self, run_id: &str) -> Result<WorkflowRun>;

    async fn list_jobs(&self, run_id: &str) -> Result<JobList>;
}

/// reqwest-backed client for one repository
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    repo: String,
    token: String,
}

impl GithubClient {
    pub fn new(
        api_url: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("runway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::network("http client", e.to_string()))?;

        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
        })
    }

    /// Client for the run described by `env`, `None` without a token or
    /// a well-formed `OWNER/REPO`
    pub fn from_ci_env(env: &CiEnvironment) -> Option<Result<Self>> {
        let token = env.token.as_deref()?;
        let (owner, repo) = env.owner_repo()?;
        Some(Self::new(&env.api_url, owner, repo, token))
    }

    fn run_url(&self, run_id: &str) -> String {
        format!(
            "{}/repos/{}/{}/actions/runs/{run_id}",
            self.api_url, self.owner, self.repo
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        tracing::debug!(url = %url, "calling workflow api");
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("token {}", self.token))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| Error::remote_api(&url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::remote_api(&url, format!("status {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::remote_api(&url, format!("invalid response body: {e}")))
    }
}

#[async_trait]
impl WorkflowApi for GithubClient {
    async fn get_run(&self, run_id: &str) -> Result<WorkflowRun> {
        self.get_json(self.run_url(run_id)).await
    }

    async fn list_jobs(&self, run_id: &str) -> Result<JobList> {
        self.get_json(format!("{}/jobs", self.run_url(run_id))).await
    }
}
