//! Structured logging for the rides service.
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: `json` (default) or `text`
//! - `RUST_LOG`: level filter (default: `info`)
//! - `SERVICE_NAME`: service name stamped on the startup event
//!
//! # Example
//!
//! ```no_run
//! use rides_service_shared::logging::{LoggingConfig, init_logging};
//!
//! init_logging(&LoggingConfig::from_env().with_service("rides"));
//! ```

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    /// Human-readable output for local runs.
    Text,
}

impl FromStr for LogFormat {
    type Err = Infallible;

    /// `text` and `pretty` select [`LogFormat::Text`]; anything else is JSON.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        })
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is not parseable.
    pub level: String,
    pub service: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            service: None,
        }
    }
}

impl LoggingConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let format = lookup("LOG_FORMAT")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        let level = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let service = lookup("SERVICE_NAME").filter(|name| !name.trim().is_empty());

        Self {
            format,
            level,
            service,
        }
    }

    /// Set the service name unless one came from the environment.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        if self.service.is_none() {
            self.service = Some(service.into());
        }
        self
    }
}

/// Install the global tracing subscriber.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place, which keeps test binaries from panicking.
///
/// # JSON Format (default)
///
/// ```json
/// {"timestamp":"2026-01-05T10:00:00Z","level":"INFO","fields":{"message":"ride created","ride_id":"6"},"target":"rides_lib::service"}
/// ```
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            service = config.service.as_deref().unwrap_or(env!("CARGO_PKG_NAME")),
            format = ?config.format,
            "logging initialized"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("TEXT".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert_eq!(" pretty ".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert_eq!("yaml".parse::<LogFormat>(), Ok(LogFormat::Json));
    }

    #[test]
    fn test_logging_config_from_lookup() {
        let config = LoggingConfig::from_lookup(|key| match key {
            "LOG_FORMAT" => Some("text".to_string()),
            "RUST_LOG" => Some("rides_lib=debug".to_string()),
            _ => None,
        });
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.level, "rides_lib=debug");
        assert!(config.service.is_none());
    }

    #[test]
    fn test_with_service_keeps_environment_name() {
        let config = LoggingConfig::from_lookup(|key| {
            (key == "SERVICE_NAME").then(|| "rides-eu".to_string())
        })
        .with_service("rides");
        assert_eq!(config.service.as_deref(), Some("rides-eu"));

        let config = LoggingConfig::default().with_service("rides");
        assert_eq!(config.service.as_deref(), Some("rides"));
    }

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging(&LoggingConfig::default());
        init_logging(&LoggingConfig::default());
    }
}
