//! Structured logging initialization
//!
//! The router only emits `tracing` events. Binaries that embed it can call
//! [`init_logging`] to install a `tracing-subscriber` registry with an
//! `EnvFilter` and either a JSON or a pretty `fmt` layer. Callers that set up
//! their own subscriber can skip this module.

use anyhow::{Context, Result};
use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output encoding of the installed `fmt` layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Multi-line human-readable events
    Pretty,
}

impl LogFormat {
    /// `pretty` in any case selects [`LogFormat::Pretty`]; anything else is JSON
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("pretty") {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        }
    }
}

/// Settings for [`init_logging`]
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `segrouter=debug,warn`
    pub log_level: String,
    pub format: LogFormat,
    /// Emit source file and line with each event
    pub include_location: bool,
}

impl LogConfig {
    /// Read `SEGROUTER_LOG_LEVEL`, `SEGROUTER_LOG_FORMAT` and
    /// `SEGROUTER_LOG_INCLUDE_LOCATION`. Unset or unparsable values fall back
    /// to `info`, JSON and no location.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_level: lookup("SEGROUTER_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format: lookup("SEGROUTER_LOG_FORMAT")
                .map_or(LogFormat::Json, |value| LogFormat::parse(&value)),
            include_location: lookup("SEGROUTER_LOG_INCLUDE_LOCATION")
                .and_then(|value| value.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Debug level, pretty output, source locations on
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
        }
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Fails if the level is not a valid filter directive or if a global
/// subscriber has already been set.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid log level directive: {}", config.log_level))?;

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Json);
    }

    #[test]
    fn test_default_dev() {
        let config = LogConfig::default_dev();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_config_defaults_when_unset() {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.include_location);
    }

    #[test]
    fn test_config_reads_each_variable() {
        let config = LogConfig::from_lookup(|key| {
            let value = match key {
                "SEGROUTER_LOG_LEVEL" => "segrouter=trace",
                "SEGROUTER_LOG_FORMAT" => "Pretty",
                "SEGROUTER_LOG_INCLUDE_LOCATION" => "true",
                _ => return None,
            };
            Some(value.to_string())
        });
        assert_eq!(config.log_level, "segrouter=trace");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.include_location);

        let config = LogConfig::from_lookup(|key| {
            (key == "SEGROUTER_LOG_INCLUDE_LOCATION").then(|| "sometimes".to_string())
        });
        assert!(!config.include_location);
    }

    #[test]
    fn test_init_logging_rejects_bad_directive() {
        let config = LogConfig {
            log_level: "=[".to_string(),
            ..LogConfig::default_dev()
        };
        let err = init_logging(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid log level directive: =["));
    }
}
