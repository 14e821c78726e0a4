//! Single-ticker report: indicator table, fundamentals and score.

use crate::domain::error::ScoreError;
use crate::domain::fundamentals::FundamentalSnapshot;
use crate::domain::indicator::{IndicatorRow, compute_indicators};
use crate::domain::normalize::{NormalizedFundamentals, normalize};
use crate::domain::price::PriceSeries;
use crate::domain::score::{ScoreBreakdown, score_table};

#[derive(Debug, Clone)]
pub struct TickerReport {
    pub ticker: String,
    pub rows: Vec<IndicatorRow>,
    pub fundamentals: NormalizedFundamentals,
    pub snapshot: FundamentalSnapshot,
    pub breakdown: ScoreBreakdown,
}

impl TickerReport {
    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }
}

pub fn build_report(
    series: &PriceSeries,
    snapshot: FundamentalSnapshot,
) -> Result<TickerReport, ScoreError> {
    let rows = compute_indicators(series);
    let fundamentals = normalize(&snapshot);
    let breakdown = score_table(series.ticker(), &rows, &fundamentals)?;

    Ok(TickerReport {
        ticker: series.ticker().to_string(),
        rows,
        fundamentals,
        snapshot,
        breakdown,
    })
}
