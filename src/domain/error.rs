//! Domain error types.

use crate::domain::universe::UniverseError;
use chrono::NaiveDateTime;

/// Top-level error type for buyscore.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("no price data for {ticker}")]
    EmptyInput { ticker: String },

    #[error("insufficient data for {ticker}: have {points} points, need {minimum}")]
    InsufficientData {
        ticker: String,
        points: usize,
        minimum: usize,
    },

    #[error("no overlapping timestamps between {left} and {right}")]
    NoOverlap { left: String, right: String },

    #[error("correlation window must be at least 2, got {window}")]
    InvalidWindow { window: usize },

    #[error("malformed fundamental field {field}: {value:?}")]
    MalformedFundamentalField { field: String, value: String },

    #[error("price series for {ticker} is not strictly increasing at {timestamp}")]
    UnorderedSeries {
        ticker: String,
        timestamp: NaiveDateTime,
    },

    #[error("non-finite {field} in {ticker} at {timestamp}")]
    NonFinitePrice {
        ticker: String,
        timestamp: NaiveDateTime,
        field: &'static str,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScoreError {
    /// Attach the series identity to errors raised below the series level.
    pub fn with_series(self, ticker: &str, points: usize) -> Self {
        match self {
            ScoreError::EmptyInput { .. } => ScoreError::EmptyInput {
                ticker: ticker.to_string(),
            },
            ScoreError::InsufficientData { minimum, .. } => ScoreError::InsufficientData {
                ticker: ticker.to_string(),
                points,
                minimum,
            },
            other => other,
        }
    }

    /// Process exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            ScoreError::Io(_) => 1,
            ScoreError::ConfigParse { .. }
            | ScoreError::ConfigMissing { .. }
            | ScoreError::ConfigInvalid { .. } => 2,
            ScoreError::Data { .. } => 3,
            ScoreError::Universe(_) => 4,
            ScoreError::EmptyInput { .. }
            | ScoreError::InsufficientData { .. }
            | ScoreError::NoOverlap { .. } => 5,
            ScoreError::InvalidWindow { .. }
            | ScoreError::MalformedFundamentalField { .. }
            | ScoreError::UnorderedSeries { .. }
            | ScoreError::NonFinitePrice { .. } => 6,
        }
    }
}

impl From<&ScoreError> for std::process::ExitCode {
    fn from(err: &ScoreError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
