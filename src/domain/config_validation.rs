//! Configuration validation.
//!
//! Validates all config fields before any command runs, and resolves the
//! typed values commands read.

use crate::domain::compare::DEFAULT_CORRELATION_WINDOW;
use crate::domain::error::ScoreError;
use crate::domain::price::DateRange;
use crate::domain::universe::parse_codes;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), ScoreError> {
    price_dir(config)?;
    date_range(config)?;
    compare_window(config)?;
    universe_codes(config)?;
    Ok(())
}

pub fn price_dir(config: &dyn ConfigPort) -> Result<String, ScoreError> {
    match config.get_string("data", "price_dir") {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ScoreError::ConfigMissing {
            section: "data".to_string(),
            key: "price_dir".to_string(),
        }),
    }
}

/// Falls back to the price directory when unset.
pub fn fundamentals_dir(config: &dyn ConfigPort) -> Result<String, ScoreError> {
    match config.get_string("data", "fundamentals_dir") {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => price_dir(config),
    }
}

pub fn date_range(config: &dyn ConfigPort) -> Result<DateRange, ScoreError> {
    let start = parse_date(config.get_string("data", "start_date").as_deref(), "start_date")?;
    let end = parse_date(config.get_string("data", "end_date").as_deref(), "end_date")?;

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(ScoreError::ConfigInvalid {
                section: "data".to_string(),
                key: "start_date".to_string(),
                reason: "start_date must not be after end_date".to_string(),
            });
        }
    }
    Ok(DateRange::new(start, end))
}

fn parse_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, ScoreError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ScoreError::ConfigInvalid {
                section: "data".to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }),
    }
}

pub fn compare_window(config: &dyn ConfigPort) -> Result<usize, ScoreError> {
    let raw = match config.get_string("compare", "window") {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Ok(DEFAULT_CORRELATION_WINDOW),
    };
    let invalid = || ScoreError::ConfigInvalid {
        section: "compare".to_string(),
        key: "window".to_string(),
        reason: "window must be an integer of at least 2".to_string(),
    };
    let window: usize = raw.trim().parse().map_err(|_| invalid())?;
    if window < 2 {
        return Err(invalid());
    }
    Ok(window)
}

/// Codes from `[universe] codes`, or `None` when the section leaves it unset.
pub fn universe_codes(config: &dyn ConfigPort) -> Result<Option<Vec<String>>, ScoreError> {
    match config.get_string("universe", "codes") {
        Some(s) if !s.trim().is_empty() => Ok(Some(parse_codes(&s)?)),
        _ => Ok(None),
    }
}
