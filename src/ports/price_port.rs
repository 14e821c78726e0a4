//! Price history port trait.

use crate::domain::error::ScoreError;
use crate::domain::price::{DateRange, PriceSeries};

/// Source of daily price history. An empty series means "no data".
pub trait PricePort: Sync {
    fn fetch_prices(&self, ticker: &str, range: DateRange) -> Result<PriceSeries, ScoreError>;

    /// Tickers this source can serve, in a stable order.
    fn list_symbols(&self) -> Result<Vec<String>, ScoreError>;
}
