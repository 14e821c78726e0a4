//! CSV file price and fundamentals adapter.
//!
//! Prices live in `<price_dir>/<TICKER>.csv` with header
//! `date,open,high,low,close,volume`. Fundamentals live in
//! `<fundamentals_dir>/<TICKER>.csv` with header `field,value`, keyed by
//! provider quote keys.

use crate::domain::error::ScoreError;
use crate::domain::fundamentals::{FundamentalSnapshot, QuoteFields};
use crate::domain::price::{DateRange, PricePoint, PriceSeries};
use crate::ports::fundamentals_port::FundamentalsPort;
use crate::ports::price_port::PricePort;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    price_dir: PathBuf,
    fundamentals_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PriceRecord {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Deserialize)]
struct FieldRecord {
    field: String,
    value: String,
}

impl CsvAdapter {
    pub fn new(price_dir: PathBuf, fundamentals_dir: PathBuf) -> Self {
        Self {
            price_dir,
            fundamentals_dir,
        }
    }

    fn csv_path(dir: &Path, ticker: &str) -> PathBuf {
        dir.join(format!("{}.csv", ticker))
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ScoreError> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .map_err(|e| ScoreError::Data {
            reason: format!("invalid date {:?}: {}", raw, e),
        })
}

impl PricePort for CsvAdapter {
    fn fetch_prices(&self, ticker: &str, range: DateRange) -> Result<PriceSeries, ScoreError> {
        let path = Self::csv_path(&self.price_dir, ticker);
        let content = fs::read_to_string(&path).map_err(|e| ScoreError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.deserialize::<PriceRecord>() {
            let record = result.map_err(|e| ScoreError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let timestamp = parse_timestamp(&record.date)?;
            if !range.contains(timestamp.date()) {
                continue;
            }
            points.push(PricePoint {
                timestamp,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                volume: record.volume as i64,
            });
        }

        points.sort_by_key(|p| p.timestamp);
        let series = PriceSeries::new(ticker, points)?;
        tracing::info!(
            ticker,
            points = series.len(),
            first = ?series.first_timestamp(),
            last = ?series.last_timestamp(),
            "prices loaded"
        );
        Ok(series)
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScoreError> {
        let entries = fs::read_dir(&self.price_dir).map_err(|e| ScoreError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.price_dir.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScoreError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(ticker) = name_str.strip_suffix(".csv") {
                symbols.push(ticker.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

impl FundamentalsPort for CsvAdapter {
    fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalSnapshot, ScoreError> {
        let path = Self::csv_path(&self.fundamentals_dir, ticker);
        if !path.exists() {
            tracing::debug!(ticker, "no fundamentals file");
            return Ok(FundamentalSnapshot::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| ScoreError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut quote = QuoteFields::default();

        for result in rdr.deserialize::<FieldRecord>() {
            let record = result.map_err(|e| ScoreError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            match quote.set(&record.field, &record.value) {
                Ok(true) => {}
                Ok(false) => tracing::debug!(ticker, field = %record.field, "ignoring quote field"),
                Err(e) => tracing::warn!(ticker, error = %e, "quote field treated as not available"),
            }
        }

        Ok(FundamentalSnapshot::from_quote(&quote))
    }
}
