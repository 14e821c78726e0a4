//! Tracing subscriber construction.
//!
//! Library code only emits `tracing` events. The binary builds a
//! [`tracing::Dispatch`] here and scopes it around command execution.

use crate::domain::error::ScoreError;
use crate::ports::config_port::ConfigPort;
use std::fmt;
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Plain => write!(f, "plain"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl From<&str> for LogFormat {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Plain,
        }
    }
}

pub fn build_dispatch(level: &str, format: LogFormat) -> Result<Dispatch, ScoreError> {
    let filter = EnvFilter::try_new(level).map_err(|e| ScoreError::ConfigInvalid {
        section: "logging".to_string(),
        key: "level".to_string(),
        reason: e.to_string(),
    })?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let dispatch = match format {
        LogFormat::Json => Dispatch::new(builder.json().finish()),
        LogFormat::Plain => Dispatch::new(builder.finish()),
    };
    Ok(dispatch)
}

/// Dispatch from the `[logging]` section, defaulting to plain `info`.
pub fn dispatch_from_config(config: &dyn ConfigPort) -> Result<Dispatch, ScoreError> {
    let level = config
        .get_string("logging", "level")
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    let format = config
        .get_string("logging", "format")
        .map(|f| LogFormat::from(f.as_str()))
        .unwrap_or(LogFormat::Plain);
    build_dispatch(level.trim(), format)
}
