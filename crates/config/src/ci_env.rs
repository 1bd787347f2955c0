//! Facts about the current CI run, read from the runner's environment

use runway_core::{
    DEFAULT_GITHUB_API_URL, GITHUB_API_URL_VAR, GITHUB_REPOSITORY_VAR, GITHUB_RUN_ID_VAR,
    GITHUB_SHA_VAR, GITHUB_TOKEN_VAR, GITHUB_WORKFLOW_VAR,
};

/// Snapshot of the runner environment taken once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CiEnvironment {
    pub workflow_name: Option<String>,
    pub commit_sha: Option<String>,
    pub run_id: Option<String>,
    /// `OWNER/REPO`
    pub repository: Option<String>,
    pub token: Option<String>,
    pub api_url: String,
}

impl CiEnvironment {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup, blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            workflow_name: get(GITHUB_WORKFLOW_VAR),
            commit_sha: get(GITHUB_SHA_VAR),
            run_id: get(GITHUB_RUN_ID_VAR),
            repository: get(GITHUB_REPOSITORY_VAR),
            token: get(GITHUB_TOKEN_VAR),
            api_url: get(GITHUB_API_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
        }
    }

    /// Split `OWNER/REPO` into its two halves
    pub fn owner_repo(&self) -> Option<(&str, &str)> {
        let repository = self.repository.as_deref()?;
        let (owner, repo) = repository.split_once('/')?;
        if owner.is_empty() || repo.is_empty() {
            return None;
        }
        Some((owner, repo))
    }
}
