use runway_core::RUNNER_DEBUG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, info_span, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// `RUST_LOG` wins when set. Otherwise the level is `info`, raised to
/// `debug` when the CI runner has step debugging switched on.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let default_directive = default_level(std::env::var(RUNNER_DEBUG_VAR).ok().as_deref());
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_directive))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn default_level(runner_debug: Option<&str>) -> &'static str {
    match runner_debug {
        Some("1") => "debug",
        _ => "info",
    }
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span for one pipeline phase
pub fn phase_span(phase: &'static str) -> Span {
    span!(Level::INFO, "phase", phase = %phase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_debug_raises_level() {
        assert_eq!(default_level(Some("1")), "debug");
        assert_eq!(default_level(Some("0")), "info");
        assert_eq!(default_level(None), "info");
    }
}
