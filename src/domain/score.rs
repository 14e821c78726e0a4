//! Buy score engine.
//!
//! Each rule is `(signal, delta, condition)` data. A condition returns
//! `None` when an input it reads is not available, which skips the rule.
//! The raw total of the applicable deltas is clamped to `[0, 100]`.

use crate::domain::error::ScoreError;
use crate::domain::indicator::table::{IndicatorRow, MIN_SERIES_LEN};
use crate::domain::normalize::NormalizedFundamentals;
use std::fmt;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const HIGH_DIVIDEND_YIELD_PCT: f64 = 3.0;
pub const LOW_PE_RATIO: f64 = 15.0;
pub const LOW_BETA: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub const MIN: Score = Score(0);
    pub const MAX: Score = Score(100);

    pub fn from_raw(raw: i32) -> Self {
        Score(raw.clamp(0, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    RsiOversold,
    RsiOverbought,
    RsiNeutral,
    MacdBullish,
    MacdBearish,
    NearLowerBand,
    HighDividendYield,
    LowPeRatio,
    LowBeta,
}

impl Signal {
    pub fn label(self) -> &'static str {
        match self {
            Signal::RsiOversold => "RSI oversold",
            Signal::RsiOverbought => "RSI overbought",
            Signal::RsiNeutral => "RSI neutral",
            Signal::MacdBullish => "MACD bullish",
            Signal::MacdBearish => "MACD bearish",
            Signal::NearLowerBand => "Near lower Bollinger band",
            Signal::HighDividendYield => "High dividend yield",
            Signal::LowPeRatio => "Low PE ratio",
            Signal::LowBeta => "Low beta",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a rule condition can read.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub row: &'a IndicatorRow,
    pub fundamentals: &'a NormalizedFundamentals,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreRule {
    pub signal: Signal,
    pub delta: i32,
    pub condition: fn(&ScoreInputs<'_>) -> Option<bool>,
}

pub const RULES: [ScoreRule; 9] = [
    ScoreRule {
        signal: Signal::RsiOversold,
        delta: 15,
        condition: |i| i.row.rsi_14.map(|rsi| rsi < RSI_OVERSOLD),
    },
    ScoreRule {
        signal: Signal::RsiOverbought,
        delta: -15,
        condition: |i| i.row.rsi_14.map(|rsi| rsi > RSI_OVERBOUGHT),
    },
    ScoreRule {
        signal: Signal::RsiNeutral,
        delta: 0,
        condition: |i| {
            i.row
                .rsi_14
                .map(|rsi| (RSI_OVERSOLD..=RSI_OVERBOUGHT).contains(&rsi))
        },
    },
    ScoreRule {
        signal: Signal::MacdBullish,
        delta: 20,
        condition: |i| Some(i.row.macd? > i.row.macd_signal?),
    },
    ScoreRule {
        signal: Signal::MacdBearish,
        delta: -10,
        condition: |i| Some(i.row.macd? <= i.row.macd_signal?),
    },
    ScoreRule {
        signal: Signal::NearLowerBand,
        delta: 15,
        condition: |i| Some(i.row.close <= i.row.bollinger_low_20?),
    },
    ScoreRule {
        signal: Signal::HighDividendYield,
        delta: 20,
        condition: |i| {
            i.fundamentals
                .dividend_yield_pct
                .map(|y| y > HIGH_DIVIDEND_YIELD_PCT)
        },
    },
    ScoreRule {
        signal: Signal::LowPeRatio,
        delta: 15,
        condition: |i| i.fundamentals.pe_ratio.map(|pe| pe < LOW_PE_RATIO),
    },
    ScoreRule {
        signal: Signal::LowBeta,
        delta: 15,
        condition: |i| i.fundamentals.beta.map(|b| b < LOW_BETA),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredRule {
    pub signal: Signal,
    pub delta: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub score: Score,
    pub raw_total: i32,
    pub fired: Vec<FiredRule>,
    /// Rules whose inputs were not available.
    pub skipped: Vec<Signal>,
}

pub fn evaluate_rules(rules: &[ScoreRule], inputs: &ScoreInputs<'_>) -> ScoreBreakdown {
    let mut raw_total = 0;
    let mut fired = Vec::new();
    let mut skipped = Vec::new();

    for rule in rules {
        match (rule.condition)(inputs) {
            Some(true) => {
                tracing::debug!(signal = %rule.signal, delta = rule.delta, "rule fired");
                raw_total += rule.delta;
                fired.push(FiredRule {
                    signal: rule.signal,
                    delta: rule.delta,
                });
            }
            Some(false) => {}
            None => {
                tracing::debug!(signal = %rule.signal, "rule skipped, input not available");
                skipped.push(rule.signal);
            }
        }
    }

    ScoreBreakdown {
        score: Score::from_raw(raw_total),
        raw_total,
        fired,
        skipped,
    }
}

pub fn score_breakdown(
    latest: Option<&IndicatorRow>,
    fundamentals: &NormalizedFundamentals,
) -> Result<ScoreBreakdown, ScoreError> {
    let row = latest.ok_or_else(|| ScoreError::EmptyInput {
        ticker: String::new(),
    })?;
    if !row.is_valid_for_scoring() {
        return Err(ScoreError::InsufficientData {
            ticker: String::new(),
            points: 0,
            minimum: MIN_SERIES_LEN,
        });
    }

    let inputs = ScoreInputs { row, fundamentals };
    Ok(evaluate_rules(&RULES, &inputs))
}

pub fn compute_score(
    latest: Option<&IndicatorRow>,
    fundamentals: &NormalizedFundamentals,
) -> Result<Score, ScoreError> {
    score_breakdown(latest, fundamentals).map(|b| b.score)
}

/// Score the final row of an indicator table for `ticker`.
pub fn score_table(
    ticker: &str,
    rows: &[IndicatorRow],
    fundamentals: &NormalizedFundamentals,
) -> Result<ScoreBreakdown, ScoreError> {
    let breakdown = score_breakdown(rows.last(), fundamentals)
        .map_err(|e| e.with_series(ticker, rows.len()))?;
    tracing::info!(ticker, score = breakdown.score.value(), "score computed");
    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::compute_indicators;
    use crate::domain::price::{PricePoint, PriceSeries};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn row(rsi: f64, macd: f64, signal: f64, close: f64, band_low: f64) -> IndicatorRow {
        IndicatorRow {
            timestamp: ts(),
            close,
            sma_20: Some(close),
            ema_20: Some(close),
            rsi_14: Some(rsi),
            macd: Some(macd),
            macd_signal: Some(signal),
            macd_diff: Some(macd - signal),
            bollinger_high_20: Some(close + 10.0),
            bollinger_low_20: Some(band_low),
        }
    }

    fn best_fundamentals() -> NormalizedFundamentals {
        NormalizedFundamentals {
            dividend_yield_pct: Some(5.3),
            pe_ratio: Some(10.0),
            beta: Some(0.7),
        }
    }

    fn signals(b: &ScoreBreakdown) -> Vec<Signal> {
        b.fired.iter().map(|f| f.signal).collect()
    }

    #[test]
    fn every_bullish_signal_reaches_100() {
        let r = row(25.0, 1.0, 0.5, 90.0, 95.0);
        let b = score_breakdown(Some(&r), &best_fundamentals()).unwrap();

        assert_eq!(b.raw_total, 100);
        assert_eq!(b.score, Score::MAX);
        assert!(b.skipped.is_empty());
    }

    #[test]
    fn every_bearish_signal_clamps_to_zero() {
        let r = row(80.0, 0.5, 1.0, 100.0, 95.0);
        let fundamentals = NormalizedFundamentals {
            dividend_yield_pct: Some(1.0),
            pe_ratio: Some(40.0),
            beta: Some(1.5),
        };
        let b = score_breakdown(Some(&r), &fundamentals).unwrap();

        assert_eq!(b.raw_total, -25);
        assert_eq!(b.score, Score::MIN);
        assert_eq!(signals(&b), vec![Signal::RsiOverbought, Signal::MacdBearish]);
    }

    #[test]
    fn neutral_rsi_contributes_nothing() {
        let r = row(70.0, 1.0, 1.0, 100.0, 95.0);
        let b = score_breakdown(Some(&r), &NormalizedFundamentals::default()).unwrap();

        // equal MACD is bearish
        assert_eq!(signals(&b), vec![Signal::RsiNeutral, Signal::MacdBearish]);
        assert_eq!(b.raw_total, -10);
        assert_eq!(b.score.value(), 0);
    }

    #[test]
    fn missing_fundamentals_are_skipped() {
        let r = row(50.0, 1.0, 0.5, 100.0, 95.0);
        let b = score_breakdown(Some(&r), &NormalizedFundamentals::default()).unwrap();

        assert_eq!(b.score.value(), 20);
        assert_eq!(
            b.skipped,
            vec![Signal::HighDividendYield, Signal::LowPeRatio, Signal::LowBeta]
        );
    }

    #[test]
    fn thresholds_are_strict() {
        let r = row(50.0, 0.0, 1.0, 100.0, 95.0);
        let fundamentals = NormalizedFundamentals {
            dividend_yield_pct: Some(3.0),
            pe_ratio: Some(15.0),
            beta: Some(1.0),
        };
        let b = score_breakdown(Some(&r), &fundamentals).unwrap();
        assert_eq!(b.raw_total, -10);
    }

    #[test]
    fn close_on_lower_band_counts() {
        let r = row(50.0, 0.0, 1.0, 95.0, 95.0);
        let b = score_breakdown(Some(&r), &NormalizedFundamentals::default()).unwrap();
        assert!(signals(&b).contains(&Signal::NearLowerBand));
        assert_eq!(b.score.value(), 5);
    }

    #[test]
    fn rule_order_does_not_change_score() {
        let r = row(28.0, 0.2, 0.4, 96.0, 95.0);
        let fundamentals = NormalizedFundamentals {
            dividend_yield_pct: Some(4.0),
            pe_ratio: None,
            beta: Some(1.2),
        };
        let inputs = ScoreInputs {
            row: &r,
            fundamentals: &fundamentals,
        };
        let expected = evaluate_rules(&RULES, &inputs);

        let mut rules = RULES.to_vec();
        rules.reverse();
        assert_eq!(evaluate_rules(&rules, &inputs).raw_total, expected.raw_total);
        for shift in 1..rules.len() {
            rules.rotate_left(shift);
            let b = evaluate_rules(&rules, &inputs);
            assert_eq!(b.raw_total, expected.raw_total);
            assert_eq!(b.score, expected.score);
        }
    }

    #[test]
    fn no_row_is_empty_input() {
        let err = compute_score(None, &best_fundamentals()).unwrap_err();
        assert!(matches!(err, ScoreError::EmptyInput { .. }));
    }

    #[test]
    fn invalid_row_is_insufficient_data() {
        let mut r = row(50.0, 1.0, 0.5, 100.0, 95.0);
        r.macd_signal = None;
        let err = compute_score(Some(&r), &best_fundamentals()).unwrap_err();
        assert!(matches!(err, ScoreError::InsufficientData { minimum: 35, .. }));
    }

    #[test]
    fn score_table_names_the_ticker() {
        let err = score_table("O", &[], &best_fundamentals()).unwrap_err();
        assert_eq!(err.to_string(), "no price data for O");
    }

    #[test]
    fn rising_series_scores_macd_bullish() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = (0..50)
            .map(|i| {
                let c = 100.0 + i as f64;
                PricePoint::daily(start + Duration::days(i), c, c, c, c, 1000)
            })
            .collect();
        let series = PriceSeries::new("UP", points).unwrap();
        let rows = compute_indicators(&series);

        let b = score_table("UP", &rows, &NormalizedFundamentals::default()).unwrap();
        assert!(signals(&b).contains(&Signal::MacdBullish));
        assert!(!signals(&b).contains(&Signal::MacdBearish));
    }

    #[test]
    fn from_raw_clamps() {
        assert_eq!(Score::from_raw(-40).value(), 0);
        assert_eq!(Score::from_raw(55).value(), 55);
        assert_eq!(Score::from_raw(250).value(), 100);
        assert_eq!(Score::from_raw(55).to_string(), "55");
        assert_eq!(format!("{:>4}", Score::from_raw(7)), "   7");
    }
}
