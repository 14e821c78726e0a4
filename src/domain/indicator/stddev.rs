//! Standard Deviation indicator.
//!
//! Population standard deviation over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n-1) / n)
//! Warmup: first (n-1) points are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PricePoint;

pub fn calculate_stddev(points: &[PricePoint], period: usize) -> IndicatorSeries {
    let values = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let value = window_stddev(points, i, period);
            IndicatorPoint::simple(point.timestamp, value)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}

/// Population standard deviation of the `period` closes ending at `end`.
fn window_stddev(points: &[PricePoint], end: usize, period: usize) -> Option<f64> {
    if period == 0 || end + 1 < period || end >= points.len() {
        return None;
    }

    let window = &points[end + 1 - period..=end];
    let mean = window.iter().map(|p| p.close).sum::<f64>() / period as f64;
    let variance = window
        .iter()
        .map(|p| {
            let diff = p.close - mean;
            diff * diff
        })
        .sum::<f64>()
        / period as f64;

    Some(variance.sqrt())
}
