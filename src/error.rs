use thiserror::Error;

/// Validation failures raised by the chart engine.
///
/// All of them are local and synchronous: nothing here is worth retrying. Callers are
/// expected to fall back to a "no data" state instead of rendering a partial chart.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// The series has no points, so there is nothing to scale.
    #[error("series has no points")]
    EmptySeries,
    /// Width or height is not a positive, finite number.
    #[error("invalid viewport {width}x{height}: both dimensions must be positive")]
    InvalidViewport { width: f64, height: f64 },
    /// The input document violates the wire contract (length mismatch, unordered periods, ...).
    #[error("malformed series: {0}")]
    MalformedSeries(String),
    /// A summary needs at least two endpoints.
    #[error("insufficient data: {points} point(s), at least 2 required")]
    InsufficientData { points: usize },
}
