//! `tracing` subscriber setup for the `upg` binary.
//!
//! Output goes to stderr so `--json` results on stdout stay parseable.
//! `RUST_LOG` directives are honoured on top of the configured level.

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub use_json: bool,
    pub include_target: bool,
    /// File and line of each event.
    pub include_location: bool,
    pub include_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: false,
            include_location: false,
            include_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// JSON lines with full metadata, for sweeps feeding log pipelines.
    pub fn structured() -> Self {
        Self {
            level: Level::INFO,
            use_json: true,
            include_target: true,
            include_location: true,
            include_thread_ids: true,
        }
    }
}

/// Case-insensitive level name, or `None` when unrecognised.
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

fn build_filter(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("upg={level}").parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids);
        let registry = tracing_subscriber::registry().with(build_filter(config.level));

        // try_init: a test harness may already own the global subscriber.
        let _ = if config.use_json {
            registry.with(layer.json()).try_init()
        } else {
            registry.with(layer).try_init()
        };
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Reads `UPG_LOG_LEVEL` and `UPG_LOG_JSON`.
pub fn init_from_env() {
    let level = env::var("UPG_LOG_LEVEL")
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(Level::INFO);
    let use_json = env::var("UPG_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig {
        level,
        use_json,
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        trace = { "trace", Some(Level::TRACE) },
        upper = { "DEBUG", Some(Level::DEBUG) },
        padded = { " info ", Some(Level::INFO) },
        warning_alias = { "warning", Some(Level::WARN) },
        unknown = { "verbose", None },
        empty = { "", None },
    )]
    fn test_parse_level(input: &str, expected: Option<Level>) {
        assert_eq!(parse_level(input), expected);
    }

    #[test]
    fn test_structured_config() {
        let config = LoggingConfig::structured();
        assert!(config.use_json);
        assert!(config.include_location);
        assert_eq!(LoggingConfig::default().level, Level::INFO);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(LoggingConfig::with_level(Level::WARN));
        init_default();
    }
}
