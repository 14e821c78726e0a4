//! Fundamentals port trait.

use crate::domain::error::ScoreError;
use crate::domain::fundamentals::FundamentalSnapshot;

pub trait FundamentalsPort: Sync {
    /// Fields the source does not know are simply absent from the snapshot.
    fn fetch_fundamentals(&self, ticker: &str) -> Result<FundamentalSnapshot, ScoreError>;
}
