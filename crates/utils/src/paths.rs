//! Well-known cache locations under the user's home directory

use std::path::PathBuf;

/// Home directory of the current user, falling back to the current directory
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Where the test runner keeps its downloaded binary
pub fn cypress_cache_dir() -> PathBuf {
    home_dir().join(".cache").join("Cypress")
}

/// npm's download cache
pub fn npm_cache_dir() -> PathBuf {
    home_dir().join(".npm")
}

/// yarn's download cache
pub fn yarn_cache_dir() -> PathBuf {
    home_dir().join(".cache").join("yarn")
}

/// `{os}-{arch}` for the host, e.g. `linux-x86_64`
pub fn platform_arch() -> String {
    format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH)
}
