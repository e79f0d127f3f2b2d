use crate::engine::ChartModel;
use crate::models::{MarketTrendDoc, TrendSeries};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Read a market-trend JSON document from disk and convert it into a series.
pub fn load_trend_json<P: AsRef<Path>>(path: P) -> Result<TrendSeries> {
    let path = path.as_ref();
    let txt = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let doc: MarketTrendDoc =
        serde_json::from_str(&txt).with_context(|| format!("parse {}", path.display()))?;
    Ok(TrendSeries::try_from(doc)?)
}

/// Save the full chart model as pretty JSON.
pub fn save_model_json<P: AsRef<Path>>(model: &ChartModel, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(model)?;
    f.write_all(s.as_bytes())?;
    info!("wrote chart model to {}", path.display());
    Ok(())
}

/// Save one CSV row per bar, with its geometry and the matching annotation.
pub fn save_bars_csv<P: AsRef<Path>>(model: &ChartModel, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize((
        "period",
        "value",
        "yoy_change",
        "sample_count",
        "color_class",
        "x",
        "y",
        "width",
        "height",
    ))?;
    for (bar, ann) in model.bars.iter().zip(&model.annotations) {
        wtr.serialize((
            bar.period,
            bar.value,
            ann.change_label.as_deref().unwrap_or(""),
            ann.sample_count,
            bar.color_class.as_str(),
            bar.x,
            bar.y,
            bar.width,
            bar.height,
        ))?;
    }
    wtr.flush()?;
    info!("wrote {} bars to {}", model.bars.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::build_chart;
    use crate::models::Viewport;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("bars.csv");
        let jsonp = dir.path().join("model.json");
        let series =
            TrendSeries::from_observations(None, &[(2022, 4100.0, 12), (2023, 4250.0, 9)], 1)
                .unwrap();
        let model = build_chart(&series, Viewport::default()).unwrap();
        save_bars_csv(&model, &csvp).unwrap();
        save_model_json(&model, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
    }
}
