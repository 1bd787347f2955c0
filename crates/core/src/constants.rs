/// Constants used throughout the runway codebase
// Inputs are exposed by the CI runner as INPUT_<NAME>
pub const INPUT_ENV_PREFIX: &str = "INPUT_";

// CI runner environment
pub const GITHUB_WORKFLOW_VAR: &str = "GITHUB_WORKFLOW";
pub const GITHUB_SHA_VAR: &str = "GITHUB_SHA";
pub const GITHUB_RUN_ID_VAR: &str = "GITHUB_RUN_ID";
pub const GITHUB_REPOSITORY_VAR: &str = "GITHUB_REPOSITORY";
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const GITHUB_API_URL_VAR: &str = "GITHUB_API_URL";
pub const GITHUB_ENV_FILE_VAR: &str = "GITHUB_ENV";
pub const RUNNER_DEBUG_VAR: &str = "RUNNER_DEBUG";

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

// Variables exported to child processes
pub const CI_VAR: &str = "CI";
pub const CYPRESS_CACHE_FOLDER_VAR: &str = "CYPRESS_CACHE_FOLDER";
pub const TERM_VAR: &str = "TERM";
pub const GH_BRANCH_VAR: &str = "GH_BRANCH";

// Test runner tool
pub const TEST_TOOL: &str = "cypress";
pub const TEST_TOOL_LAUNCHER: &str = "npx";

// Lock files, in precedence order
pub const YARN_LOCK_FILE: &str = "yarn.lock";
pub const NPM_LOCK_FILE: &str = "package-lock.json";

pub const DEFAULT_WAIT_ON_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_ARTIFACT_PATH: &str = "cypress/screenshots";
pub const DEFAULT_ARTIFACT_NAME: &str = "cypress-artifacts";
pub const DEFAULT_ARTIFACT_DIR: &str = ".runway/artifacts";
