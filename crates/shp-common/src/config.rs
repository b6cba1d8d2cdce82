//! Logging configuration shared by the launcher and init roles.

use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_LOG_FILTER;
use crate::error::ShpError;

/// Output format of log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line events.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ShpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ShpError::usage(format!(
                "unknown log format '{other}' (expected 'text' or 'json')"
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Root configuration for a shp process.
///
/// Both roles read it from the environment, so the init process inherits
/// whatever the launcher was started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShpConfig {
    /// `tracing` filter directive, e.g. `info` or `shp_core=debug`.
    pub log_filter: String,
    /// Output format of log events.
    pub log_format: LogFormat,
}

impl Default for ShpConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: LogFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().expect("json"), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().expect("text"), LogFormat::Text);
    }

    #[test]
    fn log_format_rejects_unknown() {
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn default_config_logs_info_as_text() {
        let config = ShpConfig::default();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.log_format, LogFormat::Text);
    }
}
