//! trendchart
//!
//! A small Rust library for turning a property's historical price trend into
//! renderer-neutral chart geometry. Pairs with the `trendchart` CLI.
//!
//! ### Features
//! - Decode the backend's market-trend JSON document into a validated series
//! - Scale the series into bars, a trend line, gridlines and per-point annotations
//! - Summarize the overall change between the first and last period
//! - Draw the model to SVG/PNG, or print it as a text table
//!
//! ### Example
//! ```
//! use trendchart::{TrendSeries, Viewport, build_chart};
//!
//! let series = TrendSeries::from_observations(
//!     Some("Rue de Rivoli".into()),
//!     &[(2021, 3000.0, 12), (2022, 3150.0, 9), (2023, 3300.0, 14)],
//!     0,
//! )?;
//! let model = build_chart(&series, Viewport::new(600.0, 200.0))?;
//! assert_eq!(model.bars.len(), 3);
//! assert_eq!(model.gridlines.len(), 5);
//! let summary = model.summary.expect("two or more points");
//! assert!((summary.total_change_percent - 10.0).abs() < 1e-9);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod stats;
pub mod storage;
pub mod viz;

pub use api::Client;
pub use engine::{
    BarGeometry, ChartGeometry, ChartModel, ColorClass, Gridline, Vertex, build_chart,
    compute_geometry, layout_annotations, layout_bars, layout_gridlines, layout_trend_line,
    scale_value,
};
pub use error::ChartError;
pub use models::{MarketTrendDoc, TrendPoint, TrendSeries, Viewport};
pub use stats::{TrendSummary, summarize};
