// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (clap also reads `LOG_LEVEL` for it)
//! 2. `LOG_LEVEL` environment variable, for the pass-through binary
//! 3. default to `info`
//!
//! Logs are sent to STDERR so that stdout stays free for `generate` and
//! `describe` output.

use anyhow::{Result, anyhow};
use tracing_subscriber::fmt;

use crate::cli::LogLevel;
use crate::config::EnvLookup;

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub level: Option<LogLevel>,
    pub timestamps: bool,
    pub levels: bool,
    pub json: bool,
}

impl LogOptions {
    /// Options from `LOG_LEVEL`, `LOG_TIMESTAMPS`, `LOG_LEVELS` and
    /// `MELTANO_LOG_JSON`.
    pub fn from_env(env: &dyn EnvLookup) -> Self {
        let flag = |key: &str| env.get(key).is_some_and(|v| parse_bool_str(&v));
        Self {
            level: env.get("LOG_LEVEL").and_then(|s| parse_log_level(&s)),
            timestamps: flag("LOG_TIMESTAMPS"),
            levels: flag("LOG_LEVELS"),
            json: flag("MELTANO_LOG_JSON"),
        }
    }

    pub fn max_level(&self) -> tracing::Level {
        self.level
            .map(level_from_log_level)
            .unwrap_or(tracing::Level::INFO)
    }
}

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(options: LogOptions) -> Result<()> {
    let builder = fmt()
        .with_max_level(options.max_level())
        .with_target(false)
        .with_level(options.levels)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr);

    let installed = if options.json {
        builder.json().try_init()
    } else if options.timestamps {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };

    installed.map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

/// Parse a level name as accepted in `LOG_LEVEL`.
pub fn parse_log_level(s: &str) -> Option<LogLevel> {
    match s.trim().to_lowercase().as_str() {
        "error" | "critical" => Some(LogLevel::Error),
        "warn" | "warning" => Some(LogLevel::Warn),
        "info" => Some(LogLevel::Info),
        "debug" => Some(LogLevel::Debug),
        "trace" => Some(LogLevel::Trace),
        _ => None,
    }
}

fn parse_bool_str(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_from_meltano_environment() {
        let env = |key: &str| match key {
            "LOG_LEVEL" => Some("WARNING".to_string()),
            "LOG_TIMESTAMPS" => Some("1".to_string()),
            "MELTANO_LOG_JSON" => Some("false".to_string()),
            _ => None,
        };
        let options = LogOptions::from_env(&env);
        assert_eq!(options.level, Some(LogLevel::Warn));
        assert!(options.timestamps);
        assert!(!options.levels);
        assert!(!options.json);
        assert_eq!(options.max_level(), tracing::Level::WARN);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(parse_log_level("loud"), None);
        assert_eq!(LogOptions::default().max_level(), tracing::Level::INFO);
    }
}
