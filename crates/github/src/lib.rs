//! CI platform integration for runway
//!
//! - **`api`**: the workflow-run REST API and its reqwest client.
//! - **`identity`**: the identifier shared by parallel test-runner shards.

pub mod api;
pub mod identity;

pub use api::{GithubClient, JobList, WorkflowApi, WorkflowRun};
pub use identity::resolve_parallel_run_id;
