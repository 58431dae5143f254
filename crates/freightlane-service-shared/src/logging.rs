//! Structured logging setup for Freightlane services.
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: `json` (default) or `text` (`pretty` is accepted as an alias)
//! - `RUST_LOG`: level filter (default: `info`)
//! - `SERVICE_NAME`: name attached to the startup event
//!
//! ```no_run
//! use freightlane_service_shared::logging::{init_logging, LoggingConfig};
//!
//! let config = LoggingConfig::from_env().with_service("route");
//! init_logging(&config);
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event, with the enclosing request span attached.
    #[default]
    Json,
    /// Multi-line human-readable output for local runs.
    Text,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    /// Unrecognised values select JSON so production never loses structure.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        })
    }
}

/// Configuration for the logging system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Fallback filter used when `RUST_LOG` is unset or invalid.
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
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            format: std::env::var("LOG_FORMAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.format),
            level: std::env::var("RUST_LOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.level),
            service: std::env::var("SERVICE_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    /// Set the service name unless `SERVICE_NAME` already provided one.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        if self.service.is_none() {
            self.service = Some(service.into());
        }
        self
    }
}

/// Install the global subscriber.
///
/// A second call is ignored, which keeps test binaries that share a process
/// from panicking.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            service = config.service.as_deref().unwrap_or("freightlane"),
            format = ?config.format,
            "logging initialised"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_aliases() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("Text".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert_eq!(" pretty ".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert_eq!("yaml".parse::<LogFormat>(), Ok(LogFormat::Json));
    }

    #[test]
    fn with_service_keeps_explicit_name() {
        let config = LoggingConfig {
            service: Some("freight-edge".to_string()),
            ..LoggingConfig::default()
        }
        .with_service("route");
        assert_eq!(config.service.as_deref(), Some("freight-edge"));

        let config = LoggingConfig::default().with_service("route");
        assert_eq!(config.service.as_deref(), Some("route"));
    }

    #[test]
    fn init_logging_twice_is_harmless() {
        let config = LoggingConfig {
            format: LogFormat::Text,
            ..LoggingConfig::default()
        };
        init_logging(&config);
        init_logging(&config);
    }
}
