//! Structured logging setup for jobscript
//!
//! All output goes to stderr so a script printed to stdout can be piped straight
//! into an interpreter. The level comes from the command line when given, then
//! `JOBSCRIPT_LOG_LEVEL`; `RUST_LOG` replaces the whole filter when set.
//!
//! ```no_run
//! use jobscript::util::logging::{init_logging, LoggingConfig};
//! use tracing::info;
//!
//! init_logging(&LoggingConfig::resolve(Some("debug")));
//! info!("Generating script");
//! ```

use std::env;
use std::io;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: Level,
    /// One JSON object per event instead of plain lines
    pub use_json: bool,
}

impl LoggingConfig {
    /// Combines a command-line level with `JOBSCRIPT_LOG_LEVEL` and
    /// `JOBSCRIPT_LOG_JSON`. The override wins over the environment.
    pub fn resolve(level_override: Option<&str>) -> Self {
        let level = match level_override {
            Some(level) => parse_level(level),
            None => env::var("JOBSCRIPT_LOG_LEVEL")
                .map(|level| parse_level(&level))
                .unwrap_or(Level::INFO),
        };

        let use_json = env::var("JOBSCRIPT_LOG_JSON")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self { level, use_json }
    }
}

/// Parses a log level case-insensitively. Unknown values fall back to `INFO`.
///
/// ```
/// use jobscript::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("Debug"), Level::DEBUG);
/// assert_eq!(parse_level("loud"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(format!("jobscript={}", level))
    }
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: &LoggingConfig) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(build_filter(config.level));

        if config.use_json {
            registry
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        } else {
            registry.with(fmt::layer().with_writer(io::stderr)).init();
        }
    });
}
