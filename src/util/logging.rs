//! Structured logging setup for deploy-center
//!
//! Logs go to stderr through a `tracing` subscriber so that stdout only
//! carries command output (workflow documents, JSON, YAML). The level applies
//! to the `deploy_center` target; everything else is kept at `warn` unless
//! `RUST_LOG` says otherwise.
//!
//! # Example
//!
//! ```no_run
//! use deploy_center::util::logging;
//! use tracing::{debug, info};
//!
//! logging::init_from_env();
//!
//! info!("Application started");
//! debug!(site = "app1", "Generating workflow");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

const TARGET: &str = "deploy_center";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum level for the crate's own events
    pub level: Level,

    /// JSON lines instead of the console format
    pub use_json: bool,

    /// Include the module target (e.g., deploy_center::workflow) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
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

    /// Resolves command-line flags against the environment.
    ///
    /// Precedence: explicit `--log-level`, then `-v` (debug) or `-q` (error),
    /// then `DEPLOY_CENTER_LOG_LEVEL`. `DEPLOY_CENTER_LOG_JSON` selects JSON
    /// output in every case.
    pub fn from_flags(log_level: Option<&str>, verbose: bool, quiet: bool) -> Self {
        let level = if let Some(level_str) = log_level {
            parse_level(level_str)
        } else if verbose {
            Level::DEBUG
        } else if quiet {
            Level::ERROR
        } else {
            level_from_env()
        };

        Self {
            level,
            use_json: json_from_env(),
            include_location: level == Level::TRACE,
            ..Default::default()
        }
    }
}

/// Parses a log level, case-insensitively. Unknown values fall back to INFO.
///
/// ```
/// use deploy_center::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("WARN"), Level::WARN);
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

fn level_from_env() -> Level {
    env::var("DEPLOY_CENTER_LOG_LEVEL")
        .map(|v| parse_level(&v))
        .unwrap_or(Level::INFO)
}

fn json_from_env() -> bool {
    env::var("DEPLOY_CENTER_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false)
}

fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(format!("warn,{}={}", TARGET, level))
    }
}

/// Installs the global subscriber. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}

pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Reads `DEPLOY_CENTER_LOG_LEVEL` and `DEPLOY_CENTER_LOG_JSON`.
pub fn init_from_env() {
    init_logging(LoggingConfig::from_flags(None, false, false));
}
