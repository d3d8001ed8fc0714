//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for registration-time behavior.
//!
//! ## Environment Variables
//!
//! ### `SEGROUTER_LOG_ROUTES`
//!
//! Emit one `info` event per registered route (`true`/`false`, `1`/`0`).
//!
//! Default: `true`
//!
//! ## Usage
//!
//! ```rust
//! use segrouter::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Log routes: {}", config.log_routes);
//! ```
//!
//! Configuration is only read while routes are being registered. Request
//! handling has no runtime switches.

use std::env;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Log each route as it is registered (default: true)
    pub log_routes: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { log_routes: true }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let log_routes = env::var("SEGROUTER_LOG_ROUTES")
            .ok()
            .and_then(|val| parse_flag(&val))
            .unwrap_or(defaults.log_routes);
        RuntimeConfig { log_routes }
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_default_logs_routes() {
        assert!(RuntimeConfig::default().log_routes);
    }
}
