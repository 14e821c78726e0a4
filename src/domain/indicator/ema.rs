//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with the first defined value, then
//! EMA[i] = V[i]*k + EMA[i-1]*(1-k).
//! Warmup: the average runs from the first value but is only reported once n
//! values have been observed.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price::PricePoint;

pub fn calculate_ema(points: &[PricePoint], period: usize) -> IndicatorSeries {
    let closes: Vec<Option<f64>> = points.iter().map(|p| Some(p.close)).collect();
    let ema = ema_values(&closes, period);

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values: points
            .iter()
            .zip(ema)
            .map(|(p, v)| IndicatorPoint::simple(p.timestamp, v))
            .collect(),
    }
}

/// EMA over a sequence whose leading entries may be undefined.
///
/// Undefined inputs produce undefined outputs and do not advance the average.
pub(crate) fn ema_values(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut seen = 0;
    let mut ema: Option<f64> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(v) = *value else { continue };
        let next = match ema {
            Some(prev) => v * k + prev * (1.0 - k),
            None => v,
        };
        ema = Some(next);
        seen += 1;
        if seen >= period {
            out[i] = Some(next);
        }
    }

    out
}
