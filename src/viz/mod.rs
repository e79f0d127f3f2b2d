//! Rendering surfaces for a [`ChartModel`]: **SVG** or **PNG** files via plotters, and a text table.
//!
//! The model already holds pixel coordinates, so drawing is a direct translation:
//! - dashed gridlines at the model's gridline heights
//! - bars filled by their colour class (green / red, 70% opacity)
//! - the trend polyline and its point markers on top
//!
//! Labels are not drawn into images; see [`text::render_table`] for the textual surface.

pub mod text;
pub mod util;

use crate::engine::ChartModel;
use anyhow::{Result, anyhow};
use log::info;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;

use util::{
    BAR_OPACITY, GRID_GRAY, TREND_BLUE, TREND_OPACITY, class_color, dash_segments,
};

/// Blank border around the plot so edge gridlines and markers are not clipped.
pub const CANVAS_MARGIN: u32 = 8;
const MARKER_RADIUS: i32 = 4;

/// Largest canvas side accepted for image output.
pub const MAX_CANVAS_PX: u32 = 16_384;

/// Canvas size in pixels for a model: plot area plus [`CANVAS_MARGIN`] on every side.
///
/// Fails when either side would exceed [`MAX_CANVAS_PX`].
pub fn canvas_size(model: &ChartModel) -> Result<(u32, u32)> {
    let side = |v: f64, name: &str| -> Result<u32> {
        let limit = MAX_CANVAS_PX - 2 * CANVAS_MARGIN;
        if !v.is_finite() || v < 0.0 || v.ceil() > limit as f64 {
            return Err(anyhow!(
                "plot {name} {v} exceeds the {limit}px image limit"
            ));
        }
        Ok(v.ceil() as u32 + 2 * CANVAS_MARGIN)
    };
    Ok((
        side(model.geometry.width, "width")?,
        side(model.geometry.height, "height")?,
    ))
}

/// Draw `model` to `out_path`. `.svg` selects the SVG backend, anything else PNG/bitmap.
pub fn plot_chart<P: AsRef<Path>>(model: &ChartModel, out_path: P) -> Result<()> {
    if model.bars.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = canvas_size(model)?;

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_chart(root, model)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_chart(root, model)?;
    }
    info!("wrote chart to {}", out_path.display());
    Ok(())
}

/// Draw `model` into an in-memory SVG document.
pub fn render_svg(model: &ChartModel) -> Result<String> {
    if model.bars.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    let mut buf = String::new();
    {
        let size = canvas_size(model)?;
        let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
        draw_chart(root, model)?;
    }
    Ok(buf)
}

#[inline]
fn px(x: f64, y: f64) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, model: &ChartModel) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let m = CANVAS_MARGIN as i32;
    let plot = root.margin(m, m, m, m);
    let width = model.geometry.width.round() as i32;

    // 1) Gridlines, dash 4 / gap 2
    for line in &model.gridlines {
        let y = line.y.round() as i32;
        for seg in dash_segments(0, width, y, 4, 2) {
            plot.draw(&PathElement::new(seg.to_vec(), GRID_GRAY.stroke_width(1)))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    // 2) Bars
    for bar in &model.bars {
        let rect = Rectangle::new(
            [px(bar.x, bar.y), px(bar.x + bar.width, bar.y + bar.height)],
            class_color(bar.color_class).mix(BAR_OPACITY).filled(),
        );
        plot.draw(&rect).map_err(|e| anyhow!("{:?}", e))?;
    }

    // 3) Trend line through the bar tops, then markers
    let vertices: Vec<(i32, i32)> = model.trend_line.iter().map(|v| px(v.x, v.y)).collect();
    if vertices.len() > 1 {
        plot.draw(&PathElement::new(
            vertices.clone(),
            TREND_BLUE.mix(TREND_OPACITY).stroke_width(2),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    for c in vertices {
        plot.draw(&Circle::new(c, MARKER_RADIUS, TREND_BLUE.filled()))
            .map_err(|e| anyhow!("{:?}", e))?;
        plot.draw(&Circle::new(c, MARKER_RADIUS, WHITE.stroke_width(2)))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
