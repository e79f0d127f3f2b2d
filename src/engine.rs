//! Chart engine: turns a [`TrendSeries`] into renderer-neutral drawing primitives.
//!
//! Everything here is a pure function of its inputs. The model uses a top-left origin
//! with `y` growing downwards, like SVG and most raster surfaces:
//! - one bar per point, inset to 70% of its horizontal slot
//! - a trend line through the slot centers
//! - horizontal gridlines labelled with the price at their height
//! - per-point annotations (period, YoY change, sample count)

use crate::error::ChartError;
use crate::models::{TrendSeries, Viewport};
use crate::stats::{TrendSummary, summarize};
use serde::{Deserialize, Serialize};

/// Vertical headroom added above the maximum and below the minimum, as a fraction of the range.
pub const SCALE_PADDING_FRACTION: f64 = 0.10;
/// Minimum padding for a flat series, so the scale never collapses.
pub const FLAT_SERIES_MIN_PADDING: f64 = 1.0;
/// Share of a slot covered by its bar.
pub const BAR_WIDTH_FRACTION: f64 = 0.70;
/// Margin on each side of a bar, as a share of the slot.
pub const BAR_INSET_FRACTION: f64 = 0.15;
/// Gridlines at 0, 25, 50, 75 and 100% of the height.
pub const DEFAULT_GRID_DIVISIONS: usize = 5;

/// Pixel-space scale derived from a series and a viewport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub min: f64,
    pub max: f64,
    /// `max - min`; zero for a flat series.
    pub range: f64,
    /// Headroom on both ends of the value axis.
    pub padding: f64,
    pub point_count: usize,
}

impl ChartGeometry {
    /// Total value span covered by the plot height.
    #[inline]
    pub fn padded_range(&self) -> f64 {
        self.range + 2.0 * self.padding
    }

    /// Horizontal slot allotted to each point.
    #[inline]
    pub fn slot_width(&self) -> f64 {
        self.width / self.point_count.max(1) as f64
    }

    /// Center of the slot at `index`.
    #[inline]
    pub fn slot_center(&self, index: usize) -> f64 {
        let slot = self.slot_width();
        index as f64 * slot + slot / 2.0
    }
}

/// Sign classification of a change. Renderers map it to a colour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    Positive,
    Negative,
}

impl ColorClass {
    /// `None` (no predecessor) is treated as positive.
    pub fn from_change(change: Option<f64>) -> Self {
        match change {
            Some(c) if c < 0.0 => ColorClass::Negative,
            _ => ColorClass::Positive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorClass::Positive => "positive",
            ColorClass::Negative => "negative",
        }
    }
}

/// One bar rectangle, plus the slot it sits in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BarGeometry {
    pub period: i32,
    pub value: f64,
    /// Left edge of the inset rectangle.
    pub x: f64,
    /// Top edge of the rectangle.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Left edge of the full slot (`index * slot_width`).
    pub slot_x: f64,
    pub slot_width: f64,
    pub color_class: ColorClass,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Gridline {
    pub y: f64,
    /// Fraction of the height, 0 at the top.
    pub fraction: f64,
    /// Price at this height.
    pub label_value: f64,
}

/// Text shown under a bar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Annotation {
    pub period: i32,
    /// Horizontal anchor (slot center).
    pub x: f64,
    pub period_label: String,
    /// Signed percentage with one decimal, e.g. `+10.0%`. Absent for the earliest point.
    pub change_label: Option<String>,
    pub sample_count: u32,
    pub color_class: ColorClass,
}

/// Everything a surface needs to draw one chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartModel {
    pub label: Option<String>,
    pub geometry: ChartGeometry,
    pub bars: Vec<BarGeometry>,
    pub trend_line: Vec<Vertex>,
    pub gridlines: Vec<Gridline>,
    pub annotations: Vec<Annotation>,
    /// Present only for series with at least two points.
    pub summary: Option<TrendSummary>,
    pub total_samples: u64,
    pub reported_total_sales: u64,
    pub outliers_excluded: u32,
}

/// Compute the value range and scale padding of `series` for `viewport`.
///
/// A flat series (all values equal) gets `max(|max| * 10%, 1.0)` of padding so the
/// padded range stays strictly positive.
pub fn compute_geometry(
    series: &TrendSeries,
    viewport: Viewport,
) -> Result<ChartGeometry, ChartError> {
    if series.points.is_empty() {
        return Err(ChartError::EmptySeries);
    }
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let (min, max) = series
        .points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        });
    let range = max - min;
    let padding = if range == 0.0 {
        (max.abs() * SCALE_PADDING_FRACTION).max(FLAT_SERIES_MIN_PADDING)
    } else {
        range * SCALE_PADDING_FRACTION
    };

    let geometry = ChartGeometry {
        width: viewport.width,
        height: viewport.height,
        min,
        max,
        range,
        padding,
        point_count: series.points.len(),
    };
    // A spread beyond f64 range would turn every position into NaN.
    if !geometry.padded_range().is_finite() {
        return Err(ChartError::MalformedSeries(format!(
            "value spread {min}..{max} is too wide to scale"
        )));
    }
    Ok(geometry)
}

/// Map a value to its vertical pixel position.
///
/// This is a plain affine map: values outside `[min - padding, max + padding]` land
/// outside `[0, height]` instead of being clamped.
#[inline]
pub fn scale_value(value: f64, geometry: &ChartGeometry) -> f64 {
    let normalized = (value - geometry.min + geometry.padding) / geometry.padded_range();
    geometry.height - normalized * geometry.height
}

/// Inverse of [`scale_value`]: the value drawn at vertical position `y`.
#[inline]
pub fn invert_position(y: f64, geometry: &ChartGeometry) -> f64 {
    geometry.max + geometry.padding - geometry.padded_range() * (y / geometry.height)
}

/// One bar per point, in point order.
pub fn layout_bars(series: &TrendSeries, geometry: &ChartGeometry) -> Vec<BarGeometry> {
    let slot = geometry.slot_width();
    series
        .points
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let slot_x = idx as f64 * slot;
            let y = scale_value(p.value, geometry);
            BarGeometry {
                period: p.period,
                value: p.value,
                x: slot_x + slot * BAR_INSET_FRACTION,
                y,
                width: slot * BAR_WIDTH_FRACTION,
                height: geometry.height - y,
                slot_x,
                slot_width: slot,
                color_class: ColorClass::from_change(p.yoy_change_percent),
            }
        })
        .collect()
}

/// Polyline vertices at the slot centers, in point order.
pub fn layout_trend_line(series: &TrendSeries, geometry: &ChartGeometry) -> Vec<Vertex> {
    series
        .points
        .iter()
        .enumerate()
        .map(|(idx, p)| Vertex {
            x: geometry.slot_center(idx),
            y: scale_value(p.value, geometry),
        })
        .collect()
}

/// Evenly spaced horizontal gridlines from the top (fraction 0) to the bottom (fraction 1).
///
/// `divisions` counts lines, not gaps. One division yields only the top line; zero yields none.
pub fn layout_gridlines(geometry: &ChartGeometry, divisions: usize) -> Vec<Gridline> {
    let gaps = divisions.saturating_sub(1).max(1) as f64;
    (0..divisions)
        .map(|i| {
            let fraction = i as f64 / gaps;
            Gridline {
                y: geometry.height * fraction,
                fraction,
                label_value: geometry.max + geometry.padding - geometry.padded_range() * fraction,
            }
        })
        .collect()
}

/// Signed one-decimal percentage, e.g. `+10.0%`, `-3.2%`, `0.0%`.
pub fn format_change(change: f64) -> String {
    let sign = if change > 0.0 { "+" } else { "" };
    format!("{sign}{change:.1}%")
}

/// Per-point labels anchored at the slot centers.
pub fn layout_annotations(series: &TrendSeries, geometry: &ChartGeometry) -> Vec<Annotation> {
    series
        .points
        .iter()
        .enumerate()
        .map(|(idx, p)| Annotation {
            period: p.period,
            x: geometry.slot_center(idx),
            period_label: p.period.to_string(),
            change_label: p.yoy_change_percent.map(format_change),
            sample_count: p.sample_count,
            color_class: ColorClass::from_change(p.yoy_change_percent),
        })
        .collect()
}

/// Lay out a complete chart. Either every part is computed or an error is returned.
pub fn build_chart(series: &TrendSeries, viewport: Viewport) -> Result<ChartModel, ChartError> {
    let geometry = compute_geometry(series, viewport)?;
    Ok(ChartModel {
        label: series.label.clone(),
        geometry,
        bars: layout_bars(series, &geometry),
        trend_line: layout_trend_line(series, &geometry),
        gridlines: layout_gridlines(&geometry, DEFAULT_GRID_DIVISIONS),
        annotations: layout_annotations(series, &geometry),
        summary: summarize(series).ok(),
        total_samples: series.total_samples,
        reported_total_sales: series.reported_total_sales,
        outliers_excluded: series.outliers_excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> TrendSeries {
        let obs: Vec<(i32, f64, u32)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (2018 + i as i32, *v, 3))
            .collect();
        TrendSeries::from_observations(None, &obs, 0).unwrap()
    }

    #[test]
    fn padding_is_ten_percent_of_range() {
        let g = compute_geometry(&series(&[100.0, 200.0]), Viewport::default()).unwrap();
        assert_eq!(g.min, 100.0);
        assert_eq!(g.max, 200.0);
        assert!((g.padding - 10.0).abs() < 1e-12);
    }

    #[test]
    fn flat_series_uses_value_based_padding() {
        let g = compute_geometry(&series(&[3000.0, 3000.0]), Viewport::default()).unwrap();
        assert_eq!(g.range, 0.0);
        assert!((g.padding - 300.0).abs() < 1e-9);

        let g = compute_geometry(&series(&[0.0]), Viewport::default()).unwrap();
        assert_eq!(g.padding, 1.0);
        // value sits in the middle of the plot
        assert!((scale_value(0.0, &g) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn scale_maps_padded_extremes_to_edges() {
        let g = compute_geometry(&series(&[100.0, 200.0]), Viewport::new(600.0, 200.0)).unwrap();
        assert!((scale_value(210.0, &g) - 0.0).abs() < 1e-9);
        assert!((scale_value(90.0, &g) - 200.0).abs() < 1e-9);
        // off-range values overflow instead of clamping
        assert!(scale_value(1000.0, &g) < 0.0);
        assert!(scale_value(-1000.0, &g) > 200.0);
    }

    #[test]
    fn invert_undoes_scale() {
        let g = compute_geometry(&series(&[2500.0, 3100.0, 2900.0]), Viewport::default()).unwrap();
        for v in [2500.0, 2777.7, 3100.0] {
            assert!((invert_position(scale_value(v, &g), &g) - v).abs() < 1e-6);
        }
    }

    #[test]
    fn bars_are_inset_within_their_slot() {
        let s = series(&[100.0, 90.0, 120.0]);
        let g = compute_geometry(&s, Viewport::new(300.0, 100.0)).unwrap();
        let bars = layout_bars(&s, &g);
        assert_eq!(bars.len(), 3);
        assert!((bars[1].slot_x - 100.0).abs() < 1e-9);
        assert!((bars[1].x - 115.0).abs() < 1e-9);
        assert!((bars[1].width - 70.0).abs() < 1e-9);
        assert_eq!(bars[0].color_class, ColorClass::Positive);
        assert_eq!(bars[1].color_class, ColorClass::Negative);
        assert_eq!(bars[2].color_class, ColorClass::Positive);
        for b in &bars {
            assert!((b.y + b.height - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn trend_line_follows_point_order() {
        let s = series(&[5.0, 1.0, 9.0, 3.0]);
        let g = compute_geometry(&s, Viewport::new(400.0, 100.0)).unwrap();
        let line = layout_trend_line(&s, &g);
        let xs: Vec<f64> = line.iter().map(|v| v.x).collect();
        assert_eq!(xs, vec![50.0, 150.0, 250.0, 350.0]);
        assert!(line[2].y < line[0].y && line[0].y < line[3].y && line[3].y < line[1].y);
    }

    #[test]
    fn gridline_count_follows_divisions() {
        let g = compute_geometry(&series(&[1.0, 2.0]), Viewport::default()).unwrap();
        assert_eq!(layout_gridlines(&g, 0).len(), 0);
        let one = layout_gridlines(&g, 1);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].fraction, 0.0);
        let fr: Vec<f64> = layout_gridlines(&g, 5).iter().map(|l| l.fraction).collect();
        assert_eq!(fr, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn annotations_skip_change_on_first_point() {
        let s = series(&[3000.0, 3300.0, 3300.0]);
        let g = compute_geometry(&s, Viewport::default()).unwrap();
        let a = layout_annotations(&s, &g);
        assert_eq!(a[0].change_label, None);
        assert_eq!(a[1].change_label.as_deref(), Some("+10.0%"));
        assert_eq!(a[2].change_label.as_deref(), Some("0.0%"));
        assert_eq!(a[0].period_label, "2018");
    }

    #[test]
    fn overflowing_spread_is_rejected() {
        for values in [[-1e308, 1e308], [f64::MAX, -f64::MAX]] {
            let e = compute_geometry(&series(&values), Viewport::default()).unwrap_err();
            assert!(matches!(e, ChartError::MalformedSeries(_)));
        }
        // wide but representable spreads still scale to finite positions
        let g = compute_geometry(&series(&[-1e300, 1e300]), Viewport::default()).unwrap();
        assert!(scale_value(0.0, &g).is_finite());
    }

    #[test]
    fn invalid_viewports_are_rejected() {
        let s = series(&[1.0]);
        for vp in [
            Viewport::new(0.0, 100.0),
            Viewport::new(100.0, -1.0),
            Viewport::new(f64::NAN, 100.0),
            Viewport::new(100.0, f64::INFINITY),
        ] {
            assert!(matches!(
                compute_geometry(&s, vp),
                Err(ChartError::InvalidViewport { .. })
            ));
        }
    }
}
