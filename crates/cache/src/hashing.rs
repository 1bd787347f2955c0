//! Lock-file detection and content hashing

use runway_core::{Error, Result, NPM_LOCK_FILE, YARN_LOCK_FILE};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display};
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Package manager implied by the lock file that was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Yarn,
    Npm,
}

impl PackageManager {
    /// Executable name, also used as the cache key prefix
    pub fn tool(self) -> &'static str {
        match self {
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }

    /// Full install command for CI, honouring the lock file exactly
    pub fn install_command(self) -> &'static str {
        match self {
            PackageManager::Yarn => "yarn --frozen-lockfile",
            PackageManager::Npm => "npm ci",
        }
    }

    /// Directory the manager downloads packages into
    pub fn cache_dir(self) -> PathBuf {
        match self {
            PackageManager::Yarn => runway_utils::yarn_cache_dir(),
            PackageManager::Npm => runway_utils::npm_cache_dir(),
        }
    }
}

impl Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool())
    }
}

/// The lock file chosen for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockFile {
    pub path: PathBuf,
    pub manager: PackageManager,
}

impl LockFile {
    /// Find the lock file in `dir`.
    ///
    /// `yarn.lock` wins over `package-lock.json`: yarn workspaces hoist a
    /// single lock to the workspace root and any npm lock next to it is stale.
    pub fn detect(dir: &Path) -> Result<LockFile> {
        let candidates = [
            (YARN_LOCK_FILE, PackageManager::Yarn),
            (NPM_LOCK_FILE, PackageManager::Npm),
        ];

        for (name, manager) in candidates {
            let path = dir.join(name);
            if path.is_file() {
                tracing::debug!(path = %path.display(), manager = %manager, "found lock file");
                return Ok(LockFile { path, manager });
            }
        }

        Err(Error::configuration(format!(
            "found neither {YARN_LOCK_FILE} nor {NPM_LOCK_FILE} in '{}'",
            dir.display()
        )))
    }

    /// Lowercase hex SHA-256 of the lock file's contents
    pub fn hash(&self) -> Result<String> {
        hash_file(&self.path)
    }
}

/// Hash a file's content using streaming to handle large files efficiently
pub fn hash_file(file_path: &Path) -> Result<String> {
    let file = fs::File::open(file_path)
        .map_err(|e| Error::file_system(file_path, "open file for hashing", e))?;

    let mut reader = BufReader::with_capacity(8192, file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| Error::file_system(file_path, "read file chunk for hashing", e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Hash in-memory bytes the same way [`hash_file`] hashes a file
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
