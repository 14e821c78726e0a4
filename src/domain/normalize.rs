//! Fundamental normalizer: display strings to scoring scalars.

use crate::domain::error::ScoreError;
use crate::domain::fundamentals::{FundamentalField, FundamentalSnapshot};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedFundamentals {
    pub dividend_yield_pct: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub beta: Option<f64>,
}

pub fn normalize(snapshot: &FundamentalSnapshot) -> NormalizedFundamentals {
    let field = |f: FundamentalField, parse: fn(&str) -> Result<Option<f64>, ScoreError>| {
        snapshot.get(f).and_then(|raw| degrade(parse(raw)))
    };

    NormalizedFundamentals {
        dividend_yield_pct: field(
            FundamentalField::ForwardDividendAndYield,
            parse_dividend_yield,
        ),
        pe_ratio: field(FundamentalField::TrailingPe, |raw| {
            parse_plain(FundamentalField::TrailingPe, raw)
        }),
        beta: field(FundamentalField::Beta, |raw| {
            parse_plain(FundamentalField::Beta, raw)
        }),
    }
}

fn degrade(parsed: Result<Option<f64>, ScoreError>) -> Option<f64> {
    match parsed {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "fundamental field treated as not available");
            None
        }
    }
}

/// Extract the yield percentage from a `"<rate> (<yield>%)"` display string.
///
/// Returns `Ok(None)` for shapes that carry no yield.
pub fn parse_dividend_yield(display: &str) -> Result<Option<f64>, ScoreError> {
    let portion = match display.find('(') {
        Some(open) => {
            let rest = &display[open + 1..];
            match rest.find(')') {
                Some(close) => &rest[..close],
                None => rest,
            }
        }
        None => {
            if !display.contains('%') {
                return Ok(None);
            }
            let mut numeric = display
                .split_whitespace()
                .filter(|t| t.chars().any(|c| c.is_ascii_digit()));
            match (numeric.next(), numeric.next()) {
                (Some(token), None) => token,
                _ => return Ok(None),
            }
        }
    };

    let cleaned: String = portion
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Ok(None);
    }

    let malformed = || ScoreError::MalformedFundamentalField {
        field: FundamentalField::ForwardDividendAndYield.label().to_string(),
        value: display.to_string(),
    };
    let value = cleaned.parse::<f64>().map_err(|_| malformed())?;
    if !value.is_finite() {
        return Err(malformed());
    }
    Ok(Some(value))
}

fn parse_plain(field: FundamentalField, raw: &str) -> Result<Option<f64>, ScoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("N/A") {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ScoreError::MalformedFundamentalField {
            field: field.label().to_string(),
            value: trimmed.to_string(),
        }),
    }
}
