//! Fundamental snapshot: named display fields for one ticker.
//!
//! A snapshot maps each [`FundamentalField`] to the display string a quote
//! source produced. Absent fields and the literal `N/A` are "not available".
//! [`QuoteFields`] carries the raw provider values and renders them into a
//! snapshot with [`FundamentalSnapshot::from_quote`].

use crate::domain::error::ScoreError;
use chrono::DateTime;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FundamentalField {
    PreviousClose,
    Open,
    Bid,
    Ask,
    DayRange,
    FiftyTwoWeekRange,
    Volume,
    AverageVolume,
    MarketCap,
    Beta,
    TrailingPe,
    TrailingEps,
    EarningsDate,
    ForwardDividendAndYield,
    ExDividendDate,
    TargetEstimate,
}

impl FundamentalField {
    pub const ALL: [FundamentalField; 16] = [
        FundamentalField::PreviousClose,
        FundamentalField::Open,
        FundamentalField::Bid,
        FundamentalField::Ask,
        FundamentalField::DayRange,
        FundamentalField::FiftyTwoWeekRange,
        FundamentalField::Volume,
        FundamentalField::AverageVolume,
        FundamentalField::MarketCap,
        FundamentalField::Beta,
        FundamentalField::TrailingPe,
        FundamentalField::TrailingEps,
        FundamentalField::EarningsDate,
        FundamentalField::ForwardDividendAndYield,
        FundamentalField::ExDividendDate,
        FundamentalField::TargetEstimate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FundamentalField::PreviousClose => "Previous Close",
            FundamentalField::Open => "Open",
            FundamentalField::Bid => "Bid",
            FundamentalField::Ask => "Ask",
            FundamentalField::DayRange => "Day Range",
            FundamentalField::FiftyTwoWeekRange => "52 Week Range",
            FundamentalField::Volume => "Volume",
            FundamentalField::AverageVolume => "Avg. Volume",
            FundamentalField::MarketCap => "Market Cap",
            FundamentalField::Beta => "Beta (5Y Monthly)",
            FundamentalField::TrailingPe => "PE Ratio (TTM)",
            FundamentalField::TrailingEps => "EPS (TTM)",
            FundamentalField::EarningsDate => "Earnings Date",
            FundamentalField::ForwardDividendAndYield => "Forward Dividend & Yield",
            FundamentalField::ExDividendDate => "Ex-Dividend Date",
            FundamentalField::TargetEstimate => "1y Target Est",
        }
    }
}

impl fmt::Display for FundamentalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FundamentalField {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        FundamentalField::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ScoreError::Data {
                reason: format!("unknown fundamental field: {}", trimmed),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundamentalSnapshot {
    fields: BTreeMap<FundamentalField, String>,
}

impl FundamentalSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FundamentalField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: FundamentalField, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    /// The display value, or `None` when the field is absent or `N/A`.
    pub fn get(&self, field: FundamentalField) -> Option<&str> {
        self.fields
            .get(&field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(NOT_AVAILABLE))
    }

    /// The display value with `N/A` standing in for missing fields.
    pub fn display(&self, field: FundamentalField) -> &str {
        self.fields
            .get(&field)
            .map(String::as_str)
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FundamentalField, &str)> {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn from_quote(quote: &QuoteFields) -> Self {
        let mut snapshot = Self::new();

        let mut copy = |field: FundamentalField, value: Option<f64>| {
            if let Some(v) = value {
                snapshot.insert(field, v.to_string());
            }
        };
        copy(FundamentalField::PreviousClose, quote.previous_close);
        copy(FundamentalField::Open, quote.open);
        copy(FundamentalField::Bid, quote.bid);
        copy(FundamentalField::Ask, quote.ask);
        copy(FundamentalField::Volume, quote.volume);
        copy(FundamentalField::AverageVolume, quote.average_volume);
        copy(FundamentalField::MarketCap, quote.market_cap);
        copy(FundamentalField::Beta, quote.beta);
        copy(FundamentalField::TrailingPe, quote.trailing_pe);
        copy(FundamentalField::TrailingEps, quote.trailing_eps);
        copy(FundamentalField::TargetEstimate, quote.target_mean_price);

        snapshot.insert(
            FundamentalField::DayRange,
            format_range(quote.day_low, quote.day_high),
        );
        snapshot.insert(
            FundamentalField::FiftyTwoWeekRange,
            format_range(quote.fifty_two_week_low, quote.fifty_two_week_high),
        );

        let rate = display_or_na(quote.dividend_rate);
        let yield_pct = quote
            .dividend_yield
            .map(|y| format!("{:.2} %", y * 100.0))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        snapshot.insert(
            FundamentalField::ForwardDividendAndYield,
            format!("{} ({})", rate, yield_pct),
        );

        let ex_dividend = quote
            .ex_dividend_epoch
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        snapshot.insert(FundamentalField::ExDividendDate, ex_dividend);

        if let Some(ref earnings) = quote.earnings_date {
            snapshot.insert(FundamentalField::EarningsDate, earnings.clone());
        }

        snapshot
    }
}

fn display_or_na(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn format_range(low: Option<f64>, high: Option<f64>) -> String {
    format!("{} - {}", display_or_na(low), display_or_na(high))
}

/// Raw quote values as a market-data provider reports them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteFields {
    pub previous_close: Option<f64>,
    pub open: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub day_low: Option<f64>,
    pub day_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub volume: Option<f64>,
    pub average_volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub beta: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub earnings_date: Option<String>,
    pub dividend_rate: Option<f64>,
    /// Fraction, e.g. 0.053 for 5.3%.
    pub dividend_yield: Option<f64>,
    /// Unix seconds.
    pub ex_dividend_epoch: Option<i64>,
    pub target_mean_price: Option<f64>,
}

impl QuoteFields {
    /// Set a field by its provider key (`previousClose`, `trailingPE`, ...).
    ///
    /// Returns `Ok(false)` for keys this crate does not track.
    pub fn set(&mut self, key: &str, raw: &str) -> Result<bool, ScoreError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(NOT_AVAILABLE) {
            return Ok(is_known_key(key));
        }

        let number = || -> Result<Option<f64>, ScoreError> {
            raw.parse::<f64>()
                .map(Some)
                .map_err(|_| ScoreError::MalformedFundamentalField {
                    field: key.to_string(),
                    value: raw.to_string(),
                })
        };

        match key {
            "previousClose" => self.previous_close = number()?,
            "open" => self.open = number()?,
            "bid" => self.bid = number()?,
            "ask" => self.ask = number()?,
            "dayLow" => self.day_low = number()?,
            "dayHigh" => self.day_high = number()?,
            "fiftyTwoWeekLow" => self.fifty_two_week_low = number()?,
            "fiftyTwoWeekHigh" => self.fifty_two_week_high = number()?,
            "volume" => self.volume = number()?,
            "averageVolume" => self.average_volume = number()?,
            "marketCap" => self.market_cap = number()?,
            "beta" => self.beta = number()?,
            "trailingPE" => self.trailing_pe = number()?,
            "trailingEps" => self.trailing_eps = number()?,
            "earningsDate" => self.earnings_date = Some(raw.to_string()),
            "dividendRate" => self.dividend_rate = number()?,
            "dividendYield" => self.dividend_yield = number()?,
            "exDividendDate" => {
                self.ex_dividend_epoch = Some(raw.parse::<i64>().map_err(|_| {
                    ScoreError::MalformedFundamentalField {
                        field: key.to_string(),
                        value: raw.to_string(),
                    }
                })?)
            }
            "targetMeanPrice" => self.target_mean_price = number()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn is_known_key(key: &str) -> bool {
    matches!(
        key,
        "previousClose"
            | "open"
            | "bid"
            | "ask"
            | "dayLow"
            | "dayHigh"
            | "fiftyTwoWeekLow"
            | "fiftyTwoWeekHigh"
            | "volume"
            | "averageVolume"
            | "marketCap"
            | "beta"
            | "trailingPE"
            | "trailingEps"
            | "earningsDate"
            | "dividendRate"
            | "dividendYield"
            | "exDividendDate"
            | "targetMeanPrice"
    )
}
