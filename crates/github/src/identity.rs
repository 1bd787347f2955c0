//! Identity shared by every shard of a parallel test run

use crate::api::{JobList, WorkflowApi};
use runway_config::CiEnvironment;
use runway_core::{EnvExports, ParallelRunId, GH_BRANCH_VAR};
use tracing::{debug, info, warn};

/// Resolve the identifier passed to the test runner as its build id.
///
/// The default `"{workflow} - {sha}"` identity is replaced by
/// `"{run_id}-{total_jobs}"` when the workflow API answers, and an explicit
/// override beats both. API failures never abort resolution.
pub async fn resolve_parallel_run_id(
    env: &CiEnvironment,
    api: Option<&dyn WorkflowApi>,
    override_id: Option<&str>,
    exports: &EnvExports,
) -> ParallelRunId {
    let mut identity = ParallelRunId::local(
        env.workflow_name.as_deref().unwrap_or_default(),
        env.commit_sha.as_deref().unwrap_or_default(),
    );

    match (api, env.run_id.as_deref()) {
        (Some(api), Some(run_id)) => {
            if let Some(remote) = remote_identity(api, run_id, exports).await {
                identity = remote;
            }
        }
        (Some(_), None) => debug!("no run id in environment, skipping workflow api"),
        (None, _) => debug!("no api token available, using local parallel identity"),
    }

    if let Some(custom) = override_id.filter(|id| !id.trim().is_empty()) {
        debug!(computed = %identity, "ci build id overridden by input");
        identity = ParallelRunId::custom(custom);
    }

    info!(ci_build_id = %identity, "resolved parallel run identity");
    identity
}

async fn remote_identity(
    api: &dyn WorkflowApi,
    run_id: &str,
    exports: &EnvExports,
) -> Option<ParallelRunId> {
    match api.get_run(run_id).await {
        Ok(run) => match run.head_branch {
            Some(branch) => {
                if let Err(e) = exports.export(GH_BRANCH_VAR, branch) {
                    warn!(error = %e, "failed to export branch name");
                }
            }
            None => debug!(run_id, "workflow run has no head branch"),
        },
        Err(e) => warn!(error = %e, "could not fetch workflow run"),
    }

    match api.list_jobs(run_id).await {
        Ok(JobList {
            total_count: Some(total),
        }) => Some(ParallelRunId::remote(run_id, total)),
        Ok(_) => {
            debug!(run_id, "job listing has no total count");
            None
        }
        Err(e) => {
            warn!(error = %e, "could not list workflow jobs");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GithubClient, WorkflowRun};
    use async_trait::async_trait;
    use runway_core::{Error, Result};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ci_env(token: Option<&str>) -> CiEnvironment {
        CiEnvironment {
            workflow_name: Some("e2e".to_string()),
            commit_sha: Some("abc123".to_string()),
            run_id: Some("42".to_string()),
            repository: Some("acme/shop".to_string()),
            token: token.map(str::to_string),
            api_url: "https://api.github.com".to_string(),
        }
    }

    struct StaticApi {
        run: Result<WorkflowRun>,
        jobs: Result<JobList>,
    }

    #[async_trait]
    impl WorkflowApi for StaticApi {
        async fn get_run(&self, _run_id: &str) -> Result<WorkflowRun> {
            match &self.run {
                Ok(run) => Ok(run.clone()),
                Err(_) => Err(Error::remote_api("/runs/42", "boom")),
            }
        }

        async fn list_jobs(&self, _run_id: &str) -> Result<JobList> {
            match &self.jobs {
                Ok(jobs) => Ok(jobs.clone()),
                Err(_) => Err(Error::remote_api("/runs/42/jobs", "boom")),
            }
        }
    }

    #[tokio::test]
    async fn test_without_token_uses_workflow_and_sha() {
        let exports = EnvExports::new();
        let id = resolve_parallel_run_id(&ci_env(None), None, None, &exports).await;
        assert_eq!(id.as_str(), "e2e - abc123");
        assert!(exports.is_empty());
    }

    #[tokio::test]
    async fn test_remote_total_count_replaces_default() {
        let api = StaticApi {
            run: Ok(WorkflowRun {
                head_branch: Some("main".to_string()),
            }),
            jobs: Ok(JobList {
                total_count: Some(4),
            }),
        };
        let exports = EnvExports::new();

        let id = resolve_parallel_run_id(&ci_env(Some("t")), Some(&api), None, &exports).await;

        assert_eq!(id.as_str(), "42-4");
        assert_eq!(exports.get("GH_BRANCH").as_deref(), Some("main"));
    }

    #[tokio::test]
    async fn test_api_failures_keep_default() {
        let api = StaticApi {
            run: Err(Error::remote_api("", "")),
            jobs: Err(Error::remote_api("", "")),
        };
        let exports = EnvExports::new();

        let id = resolve_parallel_run_id(&ci_env(Some("t")), Some(&api), None, &exports).await;

        assert_eq!(id.as_str(), "e2e - abc123");
        assert_eq!(exports.get("GH_BRANCH"), None);
    }

    #[tokio::test]
    async fn test_missing_total_count_keeps_default() {
        let api = StaticApi {
            run: Ok(WorkflowRun::default()),
            jobs: Ok(JobList::default()),
        };
        let id = resolve_parallel_run_id(
            &ci_env(Some("t")),
            Some(&api),
            None,
            &EnvExports::new(),
        )
        .await;
        assert_eq!(id.as_str(), "e2e - abc123");
    }

    #[tokio::test]
    async fn test_override_beats_remote_identity() {
        let api = StaticApi {
            run: Ok(WorkflowRun::default()),
            jobs: Ok(JobList {
                total_count: Some(2),
            }),
        };
        let id = resolve_parallel_run_id(
            &ci_env(Some("t")),
            Some(&api),
            Some("nightly-7"),
            &EnvExports::new(),
        )
        .await;
        assert_eq!(id.as_str(), "nightly-7");
    }

    #[tokio::test]
    async fn test_branch_lookup_failure_does_not_block_job_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/shop/actions/runs/42"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/acme/shop/actions/runs/42/jobs"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "total_count": 6 })),
            )
            .mount(&server)
            .await;

        let client = GithubClient::new(server.uri(), "acme", "shop", "t").unwrap();
        let exports = EnvExports::new();
        let id =
            resolve_parallel_run_id(&ci_env(Some("t")), Some(&client), None, &exports).await;

        assert_eq!(id.as_str(), "42-6");
        assert_eq!(exports.get("GH_BRANCH"), None);
    }
}
