//! CI workflow commands

/// Format `message` as a `::error::` workflow command.
///
/// The runner reads one command per line, so `%`, `\r` and `\n` are
/// percent-encoded.
pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
