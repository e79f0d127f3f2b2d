use std::fs;
use std::path::PathBuf;
use trendchart::viz::{self, canvas_size};
use trendchart::{ChartModel, TrendSeries, Viewport, build_chart};

fn sample_model(values: &[f64]) -> ChartModel {
    let obs: Vec<(i32, f64, u32)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (2019 + i as i32, *v, 5))
        .collect();
    let s = TrendSeries::from_observations(None, &obs, 0).unwrap();
    build_chart(&s, Viewport::new(600.0, 200.0)).unwrap()
}

fn write_and_check(model: &ChartModel, name: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join(name);
    viz::plot_chart(model, &path).unwrap();
    let meta = fs::metadata(&path).expect("file created");
    assert!(meta.len() > 0, "{name} has content");
}

#[test]
fn svg_and_png_files_are_written() {
    let model = sample_model(&[3000.0, 2900.0, 3300.0, 3450.0]);
    write_and_check(&model, "trend.svg");
    write_and_check(&model, "trend.png");
}

#[test]
fn single_point_chart_renders() {
    write_and_check(&sample_model(&[4200.0]), "single.svg");
}

#[test]
fn in_memory_svg_has_one_rect_per_bar_and_class_colours() {
    let model = sample_model(&[3000.0, 2900.0, 3300.0]);
    let svg = viz::render_svg(&model).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("#10B981"));
    assert!(svg.contains("#EF4444"));
    assert!(svg.contains("#3B82F6"));
    // background fill plus the bars
    assert!(svg.matches("<rect").count() > model.bars.len());
    assert_eq!(svg.matches("<circle").count(), 2 * model.trend_line.len());
}

#[test]
fn canvas_adds_margin_around_plot() {
    let model = sample_model(&[1.0, 2.0]);
    assert_eq!(canvas_size(&model).unwrap(), (616, 216));
}

#[test]
fn oversized_viewport_is_an_error_not_a_panic() {
    let s = TrendSeries::from_observations(None, &[(2022, 3000.0, 1), (2023, 3100.0, 1)], 0).unwrap();
    for vp in [Viewport::new(5.0e9, 200.0), Viewport::new(600.0, 1.0e6)] {
        let model = build_chart(&s, vp).unwrap();
        assert!(canvas_size(&model).is_err());
        assert!(viz::render_svg(&model).is_err());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        assert!(viz::plot_chart(&model, &path).is_err());
        assert!(!path.exists());
    }
}

#[test]
fn largest_allowed_canvas_is_accepted() {
    let model = sample_model(&[1.0, 2.0]);
    let mut big = model.clone();
    big.geometry.width = (viz::MAX_CANVAS_PX - 2 * viz::CANVAS_MARGIN) as f64;
    assert_eq!(canvas_size(&big).unwrap().0, viz::MAX_CANVAS_PX);
}
