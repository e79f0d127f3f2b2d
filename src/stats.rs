use crate::engine::ColorClass;
use crate::error::ChartError;
use crate::models::TrendSeries;
use serde::{Deserialize, Serialize};

/// Overall change between the first and the last point of a series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendSummary {
    pub earliest_period: i32,
    pub earliest_value: f64,
    pub latest_period: i32,
    pub latest_value: f64,
    /// `(latest - earliest) / earliest * 100`. Infinite or NaN when `earliest` is zero.
    pub total_change_percent: f64,
    pub total_samples: u64,
    /// Positive when `latest >= earliest`.
    pub direction: ColorClass,
}

/// Summarize a series from its two endpoints.
///
/// Fails with [`ChartError::InsufficientData`] below two points: a single observation
/// has no change to report, and callers should hide the summary rather than show 0%.
pub fn summarize(series: &TrendSeries) -> Result<TrendSummary, ChartError> {
    let (first, last) = match series.points.as_slice() {
        [first, .., last] => (first, last),
        other => return Err(ChartError::InsufficientData { points: other.len() }),
    };
    let total_change_percent = (last.value - first.value) / first.value * 100.0;
    Ok(TrendSummary {
        earliest_period: first.period,
        earliest_value: first.value,
        latest_period: last.period,
        latest_value: last.value,
        total_change_percent,
        total_samples: series.points.iter().map(|p| p.sample_count as u64).sum(),
        direction: if last.value >= first.value {
            ColorClass::Positive
        } else {
            ColorClass::Negative
        },
    })
}
