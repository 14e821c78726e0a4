//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) points are undefined.

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::price::PricePoint;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT_X100: u32 = 200;

pub fn calculate_bollinger(
    points: &[PricePoint],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let mult = stddev_mult_x100 as f64 / 100.0;
    let sma = calculate_sma(points, period);
    let stddev = calculate_stddev(points, period);

    let values = sma
        .values
        .iter()
        .zip(&stddev.values)
        .map(|(m, sd)| IndicatorPoint {
            timestamp: m.timestamp,
            value: m
                .as_simple()
                .zip(sd.as_simple())
                .map(|(middle, stddev)| IndicatorValue::Bollinger {
                    upper: middle + mult * stddev,
                    middle,
                    lower: middle - mult * stddev,
                }),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}

/// Split a band series into (upper, lower) columns.
pub fn band_columns(series: &IndicatorSeries) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    series
        .values
        .iter()
        .map(|p| match p.value {
            Some(IndicatorValue::Bollinger { upper, lower, .. }) => (Some(upper), Some(lower)),
            _ => (None, None),
        })
        .unzip()
}
