//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: the line is defined from index slow-1, the signal and histogram
//! from index slow-1 + signal-1.

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PricePoint;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

pub fn calculate_macd(
    points: &[PricePoint],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdSeries {
    let closes: Vec<Option<f64>> = points.iter().map(|p| Some(p.close)).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal = ema_values(&line, signal_period);
    let histogram: Vec<Option<f64>> = line
        .iter()
        .zip(&signal)
        .map(|(l, s)| Some((*l)? - (*s)?))
        .collect();

    let to_series = |indicator_type: IndicatorType, values: Vec<Option<f64>>| IndicatorSeries {
        indicator_type,
        values: points
            .iter()
            .zip(values)
            .map(|(p, v)| IndicatorPoint::simple(p.timestamp, v))
            .collect(),
    };

    MacdSeries {
        line: to_series(IndicatorType::MacdLine { fast, slow }, line),
        signal: to_series(
            IndicatorType::MacdSignal {
                fast,
                slow,
                signal: signal_period,
            },
            signal,
        ),
        histogram: to_series(
            IndicatorType::MacdHistogram {
                fast,
                slow,
                signal: signal_period,
            },
            histogram,
        ),
    }
}

pub fn calculate_macd_default(points: &[PricePoint]) -> MacdSeries {
    calculate_macd(points, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
