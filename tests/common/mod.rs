#![allow(dead_code)]

use buyscore::domain::error::ScoreError;
use buyscore::domain::fundamentals::FundamentalSnapshot;
pub use buyscore::domain::price::{DateRange, PricePoint, PriceSeries};
use buyscore::ports::fundamentals_port::FundamentalsPort;
use buyscore::ports::price_port::PricePort;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

pub struct MockPricePort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_prices(&self, ticker: &str, range: DateRange) -> Result<PriceSeries, ScoreError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ScoreError::Data {
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(ticker)
            .map(|pts| {
                pts.iter()
                    .filter(|p| range.contains(p.date()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        PriceSeries::new(ticker, points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, ScoreError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub struct MockFundamentalsPort {
    pub snapshots: HashMap<String, FundamentalSnapshot>,
    pub errors: HashMap<String, String>,
}

impl MockFundamentalsPort {
    pub fn new() -> Self {
        Self {
            snapshots: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_snapshot(mut self, ticker: &str, snapshot: FundamentalSnapshot) -> Self {
        self.snapshots.insert(ticker.to_string(), snapshot);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl FundamentalsPort for MockFundamentalsPort {
    fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalSnapshot, ScoreError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ScoreError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.snapshots.get(ticker).cloned().unwrap_or_default())
    }
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn make_point(date: NaiveDate, close: f64) -> PricePoint {
    PricePoint::daily(date, close, close * 1.01, close * 0.99, close, 10_000)
}

/// One point per calendar day starting at `start_date()`.
pub fn points_from_closes(closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_point(start_date() + Duration::days(i as i64), c))
        .collect()
}

pub fn rising_closes(count: usize) -> Vec<f64> {
    (0..count).map(|i| 100.0 + i as f64).collect()
}

pub fn falling_closes(count: usize) -> Vec<f64> {
    (0..count).map(|i| 200.0 - i as f64).collect()
}

pub fn wavy_closes(count: usize, phase: f64) -> Vec<f64> {
    (0..count)
        .map(|i| 100.0 + ((i as f64 + phase) * 0.35).sin() * 6.0 + i as f64 * 0.05)
        .collect()
}

pub fn series(ticker: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(ticker, points_from_closes(closes)).unwrap()
}
