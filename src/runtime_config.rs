//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the router and its logging.
//!
//! ## Environment Variables
//!
//! ### `TRIEROUTER_LOG_LEVEL`
//!
//! Default filter directive for the tracing subscriber (`info` if unset).
//! `RUST_LOG`, when present, takes precedence.
//!
//! ### `TRIEROUTER_LOG_FORMAT`
//!
//! `pretty` (default) for human-readable output, `json` for one JSON object
//! per line.
//!
//! ### `TRIEROUTER_SLOW_MATCH_US`
//!
//! Lookups slower than this many microseconds are logged at warn level.
//! Accepts decimal (`1000`) or hexadecimal (`0x3e8`). Default: `1000`.
//!
//! ## Usage
//!
//! ```rust
//! use trierouter::runtime_config::RouterConfig;
//! use trierouter::router::Router;
//!
//! let config = RouterConfig::from_env();
//! let router: Router<&str> = Router::with_config(&config);
//! assert!(router.is_empty());
//! ```
//!
//! Invalid values never fail startup; they fall back to the defaults.

use std::env;
use std::time::Duration;

use crate::logging::LogFormat;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Default `EnvFilter` directive
    pub log_level: String,
    /// Output format of the tracing subscriber
    pub log_format: LogFormat,
    /// Threshold above which a lookup is reported as slow
    pub slow_match: Duration,
}

impl RouterConfig {
    pub const DEFAULT_SLOW_MATCH_US: u64 = 1000;

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup("TRIEROUTER_LOG_LEVEL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "info".to_string());
        let log_format = lookup("TRIEROUTER_LOG_FORMAT")
            .map(|v| LogFormat::parse(&v))
            .unwrap_or(LogFormat::Pretty);
        let slow_match_us = lookup("TRIEROUTER_SLOW_MATCH_US")
            .and_then(|v| parse_number(&v))
            .unwrap_or(Self::DEFAULT_SLOW_MATCH_US);

        RouterConfig {
            log_level,
            log_format,
            slow_match: Duration::from_micros(slow_match_us),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_number(val: &str) -> Option<u64> {
    let val = val.trim();
    if let Some(hex) = val.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    }
}
