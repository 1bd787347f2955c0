use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for runway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for runway operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or malformed configuration, e.g. no lock file found
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Required executable absent from the search path
    #[error("unable to locate executable file: {tool}")]
    ToolNotFound { tool: String },

    /// Child process returned a non-zero status
    #[error("{}", format_exit_error(.command, .args, .exit_code))]
    ProcessExit {
        command: String,
        args: Vec<String>,
        exit_code: Option<i32>,
    },

    /// Child process could not be started at all
    #[error("failed to spawn '{command}': {source}")]
    ProcessSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Readiness poll exceeded its deadline
    #[error("timed out waiting for '{url}' after {timeout:?}")]
    NetworkTimeout { url: String, timeout: Duration },

    /// Best-effort remote API failure, never fatal
    #[error("remote API call to '{endpoint}' failed: {message}")]
    RemoteApi { endpoint: String, message: String },

    /// Network-related errors
    #[error("network error for '{endpoint}': {message}")]
    Network { endpoint: String, message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

fn format_exit_error(command: &str, args: &[String], exit_code: &Option<i32>) -> String {
    let mut rendered = command.to_string();
    if !args.is_empty() {
        rendered.push(' ');
        rendered.push_str(&args.join(" "));
    }
    match exit_code {
        Some(code) => format!("command '{rendered}' failed with exit code {code}"),
        None => format!("command '{rendered}' was terminated by a signal"),
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a tool-not-found error
    #[must_use]
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Error::ToolNotFound { tool: tool.into() }
    }

    /// Create a process exit error
    #[must_use]
    pub fn process_exit(
        command: impl Into<String>,
        args: Vec<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Error::ProcessExit {
            command: command.into(),
            args,
            exit_code,
        }
    }

    /// Create a process spawn error
    #[must_use]
    pub fn process_spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Error::ProcessSpawn {
            command: command.into(),
            source,
        }
    }

    /// Create a readiness timeout error
    #[must_use]
    pub fn network_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Error::NetworkTimeout {
            url: url.into(),
            timeout,
        }
    }

    /// Create a remote API error
    #[must_use]
    pub fn remote_api(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::RemoteApi {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a network error
    #[must_use]
    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Network {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Whether this error must abort the pipeline.
    ///
    /// Remote API failures are the only recoverable kind; callers log them
    /// and fall back to a default.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::RemoteApi { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_error_renders_command_line() {
        let err = Error::process_exit("yarn", vec!["--frozen-lockfile".to_string()], Some(2));
        assert_eq!(
            err.to_string(),
            "command 'yarn --frozen-lockfile' failed with exit code 2"
        );

        let err = Error::process_exit("server", vec![], None);
        assert_eq!(err.to_string(), "command 'server' was terminated by a signal");
    }

    #[test]
    fn test_only_remote_api_errors_are_recoverable() {
        assert!(!Error::remote_api("/runs/1", "404").is_fatal());
        assert!(Error::configuration("no lock file").is_fatal());
        assert!(Error::tool_not_found("yarn").is_fatal());
        assert!(Error::network_timeout("http://localhost", Duration::from_secs(1)).is_fatal());
    }
}
