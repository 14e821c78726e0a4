//! Comparative analytics for two price series.
//!
//! Both series are inner-joined on timestamp. Percentage changes are taken
//! over the aligned closes; a pair is dropped when either side has no prior
//! close or a zero prior close. Rolling correlation and cumulative return are
//! derived from the remaining pairs.

use crate::domain::error::ScoreError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDateTime;
use std::cmp::Ordering;

pub const DEFAULT_CORRELATION_WINDOW: usize = 30;

/// Paired percentage changes at one aligned timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PctChangePoint {
    pub timestamp: NaiveDateTime,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationPoint {
    pub timestamp: NaiveDateTime,
    pub correlation: f64,
}

/// Compounded return since the first defined change, as a fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CumulativeReturnPoint {
    pub timestamp: NaiveDateTime,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: String,
    pub right: String,
    pub window: usize,
    pub aligned: Vec<NaiveDateTime>,
    pub pct_change: Vec<PctChangePoint>,
    pub rolling_correlation: Vec<CorrelationPoint>,
    pub cumulative_return: Vec<CumulativeReturnPoint>,
}

impl Comparison {
    pub fn latest_correlation(&self) -> Option<f64> {
        self.rolling_correlation.last().map(|p| p.correlation)
    }
}

pub fn compare_series(
    a: &PriceSeries,
    b: &PriceSeries,
    window: usize,
) -> Result<Comparison, ScoreError> {
    if window < 2 {
        return Err(ScoreError::InvalidWindow { window });
    }

    let aligned = align(a, b);
    if aligned.is_empty() {
        return Err(ScoreError::NoOverlap {
            left: a.ticker().to_string(),
            right: b.ticker().to_string(),
        });
    }

    let pct_change = pct_changes(&aligned);
    let rolling_correlation = rolling_correlation(&pct_change, window);
    let cumulative_return = cumulative_returns(&pct_change);

    tracing::info!(
        left = a.ticker(),
        right = b.ticker(),
        aligned = aligned.len(),
        correlations = rolling_correlation.len(),
        "series compared"
    );

    Ok(Comparison {
        left: a.ticker().to_string(),
        right: b.ticker().to_string(),
        window,
        aligned: aligned.iter().map(|(ts, _, _)| *ts).collect(),
        pct_change,
        rolling_correlation,
        cumulative_return,
    })
}

/// Merge-join two ascending series on timestamp.
fn align(a: &PriceSeries, b: &PriceSeries) -> Vec<(NaiveDateTime, f64, f64)> {
    let (left, right) = (a.points(), b.points());
    let mut out = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        match left[i].timestamp.cmp(&right[j].timestamp) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push((left[i].timestamp, left[i].close, right[j].close));
                i += 1;
                j += 1;
            }
        }
    }
    out
}

fn pct_changes(aligned: &[(NaiveDateTime, f64, f64)]) -> Vec<PctChangePoint> {
    aligned
        .windows(2)
        .filter_map(|w| {
            let (_, prev_a, prev_b) = w[0];
            let (timestamp, a, b) = w[1];
            if prev_a == 0.0 || prev_b == 0.0 {
                return None;
            }
            Some(PctChangePoint {
                timestamp,
                left: (a - prev_a) / prev_a * 100.0,
                right: (b - prev_b) / prev_b * 100.0,
            })
        })
        .collect()
}

fn rolling_correlation(changes: &[PctChangePoint], window: usize) -> Vec<CorrelationPoint> {
    if changes.len() < window {
        return Vec::new();
    }

    (window..=changes.len())
        .filter_map(|end| {
            let slice = &changes[end - window..end];
            pearson(slice).map(|correlation| CorrelationPoint {
                timestamp: slice[window - 1].timestamp,
                correlation,
            })
        })
        .collect()
}

/// Pearson correlation, `None` when either side has zero variance.
fn pearson(pairs: &[PctChangePoint]) -> Option<f64> {
    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.left).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.right).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for p in pairs {
        let da = p.left - mean_a;
        let db = p.right - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

fn cumulative_returns(changes: &[PctChangePoint]) -> Vec<CumulativeReturnPoint> {
    let mut growth_a = 1.0;
    let mut growth_b = 1.0;
    changes
        .iter()
        .map(|p| {
            growth_a *= 1.0 + p.left / 100.0;
            growth_b *= 1.0 + p.right / 100.0;
            CumulativeReturnPoint {
                timestamp: p.timestamp,
                left: growth_a - 1.0,
                right: growth_b - 1.0,
            }
        })
        .collect()
}
