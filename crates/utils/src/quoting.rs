//! Shell-safe argument quoting.
//!
//! The Windows console re-parses the command line of the launched tool, so
//! arguments that carry user text are wrapped in double quotes there. Other
//! hosts pass argument vectors straight to `execve` and need no quoting.

/// Whether arguments are quoted before invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotingPolicy {
    /// Pass arguments through untouched
    PassThrough,
    /// Wrap every argument in double quotes
    DoubleQuote,
}

impl QuotingPolicy {
    /// Policy for the host the binary was compiled for
    pub fn host() -> Self {
        if cfg!(windows) {
            QuotingPolicy::DoubleQuote
        } else {
            QuotingPolicy::PassThrough
        }
    }

    pub fn apply(self, arg: &str) -> String {
        match self {
            QuotingPolicy::PassThrough => arg.to_string(),
            QuotingPolicy::DoubleQuote => quote(arg),
        }
    }
}

/// Wrap `arg` in double quotes, escaping embedded quotes
pub fn quote(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if c == '"' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
