//! Turning a free-form command string into something executable

use runway_core::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Split `full_command` into a tool name and its arguments.
///
/// Quoted substrings stay single arguments. A backslash only escapes `"`
/// or `\\` inside double quotes; everywhere else it is literal, so Windows
/// paths pass through untouched.
pub fn split_command(full_command: &str) -> Result<(String, Vec<String>)> {
    let mut words = split_words(full_command)?;

    if words.is_empty() {
        return Err(Error::configuration("command is empty"));
    }

    let tool = words.remove(0);
    Ok((tool, words))
}

/// Split a whitespace separated list of words, e.g. a command prefix
pub fn split_words(words: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = words.chars().peekable();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('"'), '\\') if matches!(chars.peek(), Some('"' | '\\')) => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    out.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(Error::configuration(format!("unbalanced quotes in '{words}'")));
    }
    if in_word {
        out.push(current);
    }
    Ok(out)
}

/// Resolve `tool` to an absolute path using the process search path.
/// Relative paths containing a separator resolve against `working_dir`.
pub fn resolve_tool(tool: &str, working_dir: &Path) -> Result<PathBuf> {
    resolve_tool_in(tool, std::env::var_os("PATH"), working_dir)
}

/// [`resolve_tool`] against an explicit search path
pub fn resolve_tool_in(
    tool: &str,
    search_path: Option<OsString>,
    working_dir: &Path,
) -> Result<PathBuf> {
    let resolved = which::which_in(tool, search_path, working_dir)
        .map_err(|_| Error::tool_not_found(tool))?;
    tracing::debug!(tool = %tool, path = %resolved.display(), "resolved tool");
    Ok(resolved)
}
