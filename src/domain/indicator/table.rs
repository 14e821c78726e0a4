//! Row-oriented indicator table.
//!
//! `compute_indicators` runs every indicator over a price series and zips the
//! results into one [`IndicatorRow`] per input point. A non-empty series shorter
//! than [`MIN_SERIES_LEN`] yields rows with only `close` populated.

use crate::domain::indicator::bollinger::{self, band_columns, calculate_bollinger};
use crate::domain::indicator::macd::{self, calculate_macd_default};
use crate::domain::indicator::rsi::{self, calculate_rsi};
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::calculate_ema;
use crate::domain::price::PriceSeries;
use chrono::NaiveDateTime;

pub const SMA_PERIOD: usize = 20;
pub const EMA_PERIOD: usize = 20;

/// Longest lookback in the table: the MACD signal over the slow EMA.
pub const MIN_SERIES_LEN: usize = macd::DEFAULT_SLOW + macd::DEFAULT_SIGNAL;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub sma_20: Option<f64>,
    pub ema_20: Option<f64>,
    pub rsi_14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_diff: Option<f64>,
    pub bollinger_high_20: Option<f64>,
    pub bollinger_low_20: Option<f64>,
}

impl IndicatorRow {
    fn close_only(timestamp: NaiveDateTime, close: f64) -> Self {
        Self {
            timestamp,
            close,
            sma_20: None,
            ema_20: None,
            rsi_14: None,
            macd: None,
            macd_signal: None,
            macd_diff: None,
            bollinger_high_20: None,
            bollinger_low_20: None,
        }
    }

    /// True when every field the score engine reads is defined.
    pub fn is_valid_for_scoring(&self) -> bool {
        self.close.is_finite()
            && self.rsi_14.is_some()
            && self.macd.is_some()
            && self.macd_signal.is_some()
            && self.bollinger_low_20.is_some()
    }

    pub fn is_fully_defined(&self) -> bool {
        self.is_valid_for_scoring()
            && self.sma_20.is_some()
            && self.ema_20.is_some()
            && self.macd_diff.is_some()
            && self.bollinger_high_20.is_some()
    }
}

pub fn compute_indicators(series: &PriceSeries) -> Vec<IndicatorRow> {
    let points = series.points();

    if points.len() < MIN_SERIES_LEN {
        return points
            .iter()
            .map(|p| IndicatorRow::close_only(p.timestamp, p.close))
            .collect();
    }

    let sma = calculate_sma(points, SMA_PERIOD).simple_values();
    let ema = calculate_ema(points, EMA_PERIOD).simple_values();
    let rsi = calculate_rsi(points, rsi::DEFAULT_PERIOD).simple_values();
    let macd = calculate_macd_default(points);
    let macd_line = macd.line.simple_values();
    let macd_signal = macd.signal.simple_values();
    let macd_diff = macd.histogram.simple_values();
    let (band_high, band_low) = band_columns(&calculate_bollinger(
        points,
        bollinger::DEFAULT_PERIOD,
        bollinger::DEFAULT_STDDEV_MULT_X100,
    ));

    let rows: Vec<IndicatorRow> = points
        .iter()
        .enumerate()
        .map(|(i, p)| IndicatorRow {
            timestamp: p.timestamp,
            close: p.close,
            sma_20: sma[i],
            ema_20: ema[i],
            rsi_14: rsi[i],
            macd: macd_line[i],
            macd_signal: macd_signal[i],
            macd_diff: macd_diff[i],
            bollinger_high_20: band_high[i],
            bollinger_low_20: band_low[i],
        })
        .collect();

    tracing::debug!(
        ticker = series.ticker(),
        rows = rows.len(),
        "indicator table computed"
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;
    use chrono::{Duration, NaiveDate};

    fn series_of(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint::daily(start + Duration::days(i as i64), c, c, c, c, 1000))
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    fn wavy(count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| 100.0 + (i as f64 * 0.4).sin() * 8.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn empty_series_gives_empty_table() {
        assert!(compute_indicators(&PriceSeries::empty("TEST")).is_empty());
    }

    #[test]
    fn short_series_only_has_close() {
        let rows = compute_indicators(&series_of(&wavy(MIN_SERIES_LEN - 1)));

        assert_eq!(rows.len(), MIN_SERIES_LEN - 1);
        for row in &rows {
            assert!(row.sma_20.is_none());
            assert!(row.rsi_14.is_none());
            assert!(row.macd_signal.is_none());
            assert!(!row.is_valid_for_scoring());
        }
        assert_eq!(rows[5].close, wavy(MIN_SERIES_LEN - 1)[5]);
    }

    #[test]
    fn single_point_series() {
        let rows = compute_indicators(&series_of(&[42.0]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].close, 42.0);
        assert!(!rows[0].is_valid_for_scoring());
    }

    #[test]
    fn warmup_boundaries_per_field() {
        let rows = compute_indicators(&series_of(&wavy(60)));

        assert!(rows[18].sma_20.is_none() && rows[19].sma_20.is_some());
        assert!(rows[18].ema_20.is_none() && rows[19].ema_20.is_some());
        assert!(rows[13].rsi_14.is_none() && rows[14].rsi_14.is_some());
        assert!(rows[24].macd.is_none() && rows[25].macd.is_some());
        assert!(rows[32].macd_signal.is_none() && rows[33].macd_signal.is_some());
        assert!(rows[32].macd_diff.is_none() && rows[33].macd_diff.is_some());
        assert!(rows[18].bollinger_low_20.is_none() && rows[19].bollinger_low_20.is_some());
    }

    #[test]
    fn rows_from_34_are_fully_defined() {
        let rows = compute_indicators(&series_of(&wavy(MIN_SERIES_LEN)));
        assert_eq!(rows.len(), MIN_SERIES_LEN);
        assert!(rows[34].is_fully_defined());
    }

    #[test]
    fn rows_are_index_aligned() {
        let series = series_of(&wavy(40));
        let rows = compute_indicators(&series);

        for (row, point) in rows.iter().zip(series.points()) {
            assert_eq!(row.timestamp, point.timestamp);
            assert_eq!(row.close, point.close);
        }
    }

    #[test]
    fn bands_bracket_sma() {
        let rows = compute_indicators(&series_of(&wavy(50)));
        for row in rows.iter().skip(19) {
            let sma = row.sma_20.unwrap();
            assert!(row.bollinger_high_20.unwrap() >= sma);
            assert!(row.bollinger_low_20.unwrap() <= sma);
        }
    }

    #[test]
    fn min_series_len_covers_macd_signal() {
        assert_eq!(MIN_SERIES_LEN, 35);
    }
}
