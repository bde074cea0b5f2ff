use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Initialize the tracing system
///
/// `RUST_LOG` wins over `level` when set. Output goes to stderr in compact
/// form, with colors only when stderr is a terminal.
pub fn init(level: &str) -> Result<(), InitError> {
    let filter = build_filter(std::env::var("RUST_LOG").ok(), level)?;

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

/// The filter for an optional `RUST_LOG` value and the configured level
pub fn build_filter(env: Option<String>, level: &str) -> Result<EnvFilter, InitError> {
    let directives = env
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| level.to_string());
    Ok(EnvFilter::try_new(directives)?)
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Span covering the handling of one input line or clock tick
pub fn event_span(event: &str) -> Span {
    span!(Level::INFO, "event", event = %event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_is_used() {
        let filter = build_filter(None, "debug").unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_env_wins() {
        let filter = build_filter(Some("warn".into()), "debug").unwrap();
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let filter = build_filter(Some("  ".into()), "error").unwrap();
        assert_eq!(filter.to_string(), "error");
    }
}
