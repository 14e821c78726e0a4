//! Price points and ordered price series.

use crate::domain::error::ScoreError;
use chrono::{NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PricePoint {
    /// Point for a daily session, stamped at midnight.
    pub fn daily(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: i64) -> Self {
        Self {
            timestamp: date.and_time(chrono::NaiveTime::MIN),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// First OHLC field that is NaN or infinite.
    fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// Chronologically ascending points for one ticker, no duplicate timestamps
/// and finite OHLC values.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, ScoreError> {
        let ticker = ticker.into();
        if let Some(pair) = points
            .windows(2)
            .find(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(ScoreError::UnorderedSeries {
                ticker,
                timestamp: pair[1].timestamp,
            });
        }
        if let Some((point, field)) = points
            .iter()
            .find_map(|p| p.non_finite_field().map(|f| (p, f)))
        {
            return Err(ScoreError::NonFinitePrice {
                ticker,
                timestamp: point.timestamp,
                field,
            });
        }
        Ok(Self { ticker, points })
    }

    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            points: Vec::new(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.points.first().map(|p| p.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.points.last().map(|p| p.timestamp)
    }
}

/// Inclusive calendar range requested from a price source. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, close: f64) -> PricePoint {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        PricePoint::daily(date, close, close + 1.0, close - 1.0, close, 1000)
    }

    #[test]
    fn series_accepts_ascending_points() {
        let series = PriceSeries::new("AAPL", vec![point(1, 10.0), point(2, 11.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.ticker(), "AAPL");
        assert_eq!(series.closes().collect::<Vec<_>>(), vec![10.0, 11.0]);
    }

    #[test]
    fn series_rejects_duplicate_timestamp() {
        let result = PriceSeries::new("AAPL", vec![point(1, 10.0), point(1, 11.0)]);
        assert!(matches!(result, Err(ScoreError::UnorderedSeries { .. })));
    }

    #[test]
    fn series_rejects_descending_points() {
        let result = PriceSeries::new("AAPL", vec![point(3, 10.0), point(2, 11.0)]);
        assert!(matches!(
            result,
            Err(ScoreError::UnorderedSeries { ticker, .. }) if ticker == "AAPL"
        ));
    }

    #[test]
    fn series_rejects_nan_close() {
        let points = vec![point(1, 10.0), point(2, f64::NAN), point(3, 12.0)];
        match PriceSeries::new("AAPL", points) {
            Err(ScoreError::NonFinitePrice {
                ticker,
                timestamp,
                field,
            }) => {
                assert_eq!(ticker, "AAPL");
                assert_eq!(timestamp.date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
                assert_eq!(field, "close");
            }
            other => panic!("expected NonFinitePrice, got {:?}", other),
        }
    }

    #[test]
    fn series_rejects_infinite_high() {
        let mut bad = point(2, 11.0);
        bad.high = f64::INFINITY;
        let result = PriceSeries::new("AAPL", vec![point(1, 10.0), bad]);
        assert!(matches!(
            result,
            Err(ScoreError::NonFinitePrice { field: "high", .. })
        ));
    }

    #[test]
    fn empty_series() {
        let series = PriceSeries::empty("MSFT");
        assert!(series.is_empty());
        assert_eq!(series.first_timestamp(), None);
        assert_eq!(series.last_timestamp(), None);
    }

    #[test]
    fn series_span() {
        let series = PriceSeries::new("AAPL", vec![point(1, 10.0), point(5, 11.0)]).unwrap();
        assert_eq!(series.first_timestamp().map(|t| t.date()), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(series.last_timestamp().map(|t| t.date()), NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    #[test]
    fn daily_point_is_midnight() {
        let p = point(15, 100.0);
        assert_eq!(p.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(p.timestamp.time(), chrono::NaiveTime::MIN);
    }

    #[test]
    fn date_range_bounds() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 2),
            NaiveDate::from_ymd_opt(2024, 1, 4),
        );
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 1, 4).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()));
        assert!(DateRange::default().contains(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()));
    }
}
