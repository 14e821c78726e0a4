//! Universe scan: score every ticker in a code list and pick the best.
//!
//! Tickers are scored in parallel; results keep universe order so the best
//! pick reduction is stable (first ticker to reach a score wins ties).

use crate::domain::error::ScoreError;
use crate::domain::fundamentals::FundamentalSnapshot;
use crate::domain::indicator::compute_indicators;
use crate::domain::indicator::table::MIN_SERIES_LEN;
use crate::domain::normalize::normalize;
use crate::domain::price::DateRange;
use crate::domain::score::{Score, ScoreBreakdown, score_table};
use crate::ports::fundamentals_port::FundamentalsPort;
use crate::ports::price_port::PricePort;
use rayon::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),

    #[error("universe is empty")]
    Empty,
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

#[derive(Debug, Clone)]
pub struct ScoredTicker {
    pub ticker: String,
    pub points: usize,
    pub breakdown: ScoreBreakdown,
}

impl ScoredTicker {
    pub fn score(&self) -> Score {
        self.breakdown.score
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoData,
    InsufficientData { points: usize },
}

#[derive(Debug, Clone)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Scored tickers in universe order.
    pub scored: Vec<ScoredTicker>,
    pub skipped: Vec<SkippedTicker>,
}

impl ScanResult {
    pub fn best(&self) -> Option<&ScoredTicker> {
        select_best(&self.scored)
    }
}

enum Outcome {
    Scored(ScoredTicker),
    Skipped(SkippedTicker),
}

pub fn scan_universe(
    prices: &dyn PricePort,
    fundamentals: &dyn FundamentalsPort,
    codes: &[String],
    range: DateRange,
) -> Result<ScanResult, ScoreError> {
    if codes.is_empty() {
        return Err(UniverseError::Empty.into());
    }

    let outcomes: Vec<Outcome> = codes
        .par_iter()
        .map(|ticker| score_ticker(prices, fundamentals, ticker, range))
        .collect::<Result<_, _>>()?;

    let mut scored = Vec::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Scored(s) => scored.push(s),
            Outcome::Skipped(s) => skipped.push(s),
        }
    }

    if scored.is_empty() {
        return Err(ScoreError::InsufficientData {
            ticker: "all".to_string(),
            points: 0,
            minimum: MIN_SERIES_LEN,
        });
    }

    tracing::info!(
        scored = scored.len(),
        skipped = skipped.len(),
        "universe scan complete"
    );
    Ok(ScanResult { scored, skipped })
}

fn score_ticker(
    prices: &dyn PricePort,
    fundamentals: &dyn FundamentalsPort,
    ticker: &str,
    range: DateRange,
) -> Result<Outcome, ScoreError> {
    let skip = |reason: SkipReason| {
        Ok(Outcome::Skipped(SkippedTicker {
            ticker: ticker.to_string(),
            reason,
        }))
    };

    let series = match prices.fetch_prices(ticker, range) {
        Ok(series) => series,
        Err(e) => {
            tracing::warn!(ticker, error = %e, "skipping ticker, price fetch failed");
            return skip(SkipReason::NoData);
        }
    };
    if series.is_empty() {
        tracing::warn!(ticker, "skipping ticker, no price data");
        return skip(SkipReason::NoData);
    }

    let snapshot = fundamentals.fetch_fundamentals(ticker).unwrap_or_else(|e| {
        tracing::warn!(ticker, error = %e, "fundamentals unavailable, scoring technicals only");
        FundamentalSnapshot::new()
    });

    let rows = compute_indicators(&series);
    match score_table(ticker, &rows, &normalize(&snapshot)) {
        Ok(breakdown) => Ok(Outcome::Scored(ScoredTicker {
            ticker: ticker.to_string(),
            points: series.len(),
            breakdown,
        })),
        Err(ScoreError::InsufficientData { points, .. }) => {
            tracing::warn!(
                ticker,
                points,
                minimum = MIN_SERIES_LEN,
                "skipping ticker, insufficient data"
            );
            skip(SkipReason::InsufficientData { points })
        }
        Err(e) => Err(e),
    }
}

/// Running maximum from 0, replaced only on a strictly greater score.
pub fn select_best(results: &[ScoredTicker]) -> Option<&ScoredTicker> {
    let mut best_score = Score::MIN;
    let mut best = None;
    for result in results {
        if result.score() > best_score {
            best_score = result.score();
            best = Some(result);
        }
    }
    best
}
