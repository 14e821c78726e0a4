//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean of the trailing n closes. Warmup: first (n-1) points are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PricePoint;

pub fn calculate_sma(points: &[PricePoint], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(points.len());
    let mut sum = 0.0;

    for (i, point) in points.iter().enumerate() {
        sum += point.close;
        if period > 0 && i >= period {
            sum -= points[i - period].close;
        }

        let sma = (period > 0 && i + 1 >= period).then(|| sum / period as f64);
        values.push(IndicatorPoint::simple(point.timestamp, sma));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
