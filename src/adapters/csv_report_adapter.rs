//! CSV report writer for indicator tables and comparisons.

use crate::domain::compare::Comparison;
use crate::domain::error::ScoreError;
use crate::domain::report::TickerReport;
use crate::ports::report_port::ReportPort;
use chrono::{NaiveDateTime, NaiveTime};
use std::path::Path;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

const INDICATOR_HEADER: [&str; 10] = [
    "timestamp",
    "close",
    "sma_20",
    "ema_20",
    "rsi_14",
    "macd",
    "macd_signal",
    "macd_diff",
    "bollinger_high_20",
    "bollinger_low_20",
];

const COMPARISON_HEADER: [&str; 6] = [
    "timestamp",
    "pct_change_left",
    "pct_change_right",
    "rolling_correlation",
    "cumulative_return_left",
    "cumulative_return_right",
];

fn format_timestamp(ts: NaiveDateTime) -> String {
    if ts.time() == NaiveTime::MIN {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn csv_error(path: &str, e: csv::Error) -> ScoreError {
    ScoreError::Data {
        reason: format!("failed to write {}: {}", path, e),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_report(&self, report: &TickerReport, output_path: &str) -> Result<(), ScoreError> {
        let mut wtr = csv::Writer::from_path(Path::new(output_path))
            .map_err(|e| csv_error(output_path, e))?;
        wtr.write_record(INDICATOR_HEADER)
            .map_err(|e| csv_error(output_path, e))?;

        for row in &report.rows {
            wtr.write_record([
                format_timestamp(row.timestamp),
                row.close.to_string(),
                cell(row.sma_20),
                cell(row.ema_20),
                cell(row.rsi_14),
                cell(row.macd),
                cell(row.macd_signal),
                cell(row.macd_diff),
                cell(row.bollinger_high_20),
                cell(row.bollinger_low_20),
            ])
            .map_err(|e| csv_error(output_path, e))?;
        }
        wtr.flush()?;

        tracing::info!(
            ticker = %report.ticker,
            rows = report.rows.len(),
            path = output_path,
            "indicator table written"
        );
        Ok(())
    }

    fn write_comparison(
        &self,
        comparison: &Comparison,
        output_path: &str,
    ) -> Result<(), ScoreError> {
        let mut wtr = csv::Writer::from_path(Path::new(output_path))
            .map_err(|e| csv_error(output_path, e))?;
        wtr.write_record(COMPARISON_HEADER)
            .map_err(|e| csv_error(output_path, e))?;

        let mut correlations = comparison.rolling_correlation.iter().peekable();
        for (change, cumulative) in comparison
            .pct_change
            .iter()
            .zip(&comparison.cumulative_return)
        {
            let correlation = correlations
                .next_if(|c| c.timestamp == change.timestamp)
                .map(|c| c.correlation);
            wtr.write_record([
                format_timestamp(change.timestamp),
                change.left.to_string(),
                change.right.to_string(),
                cell(correlation),
                cumulative.left.to_string(),
                cumulative.right.to_string(),
            ])
            .map_err(|e| csv_error(output_path, e))?;
        }
        wtr.flush()?;

        tracing::info!(
            left = %comparison.left,
            right = %comparison.right,
            rows = comparison.pct_change.len(),
            path = output_path,
            "comparison written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compare::compare_series;
    use crate::domain::fundamentals::FundamentalSnapshot;
    use crate::domain::price::{PricePoint, PriceSeries};
    use crate::domain::report::build_report;
    use chrono::{Duration, NaiveDate};
    use std::fs;
    use tempfile::TempDir;

    fn series(ticker: &str, closes: impl Iterator<Item = f64>) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = closes
            .enumerate()
            .map(|(i, c)| PricePoint::daily(start + Duration::days(i as i64), c, c, c, c, 10))
            .collect();
        PriceSeries::new(ticker, points).unwrap()
    }

    #[test]
    fn report_csv_has_blank_warmup_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.csv");
        let s = series("O", (0..40).map(|i| 50.0 + (i as f64 * 0.5).sin()));
        let report = build_report(&s, FundamentalSnapshot::new()).unwrap();

        CsvReportAdapter::new()
            .write_report(&report, path.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 41);
        assert_eq!(lines[0], INDICATOR_HEADER.join(","));
        assert!(lines[1].starts_with("2024-01-01,50,,,,"));
        assert!(!lines[40].contains(",,"));
    }

    #[test]
    fn comparison_csv_aligns_correlation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("compare.csv");
        let a = series("A", (0..8).map(|i| 10.0 + (i as f64).sin()));
        let b = series("B", (0..8).map(|i| 20.0 + (i as f64 * 1.3).cos()));
        let comparison = compare_series(&a, &b, 3).unwrap();

        CsvReportAdapter::new()
            .write_comparison(&comparison, path.to_str().unwrap())
            .unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 7);
        assert_eq!(&records[0][0], "2024-01-02");
        assert_eq!(&records[0][3], "");
        assert_eq!(&records[1][3], "");
        assert_ne!(&records[2][3], "");
        assert_ne!(&records[6][3], "");
    }

    #[test]
    fn unwritable_path_is_data_error() {
        let s = series("O", (0..40).map(|i| 50.0 + i as f64));
        let report = build_report(&s, FundamentalSnapshot::new()).unwrap();
        let err = CsvReportAdapter::new()
            .write_report(&report, "/nonexistent/dir/report.csv")
            .unwrap_err();
        assert!(matches!(err, ScoreError::Data { .. }));
    }

    #[test]
    fn hourly_timestamps_keep_time() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(format_timestamp(ts), "2024-01-02 14:30:00");
    }
}
