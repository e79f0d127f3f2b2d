//! Plain-text rendering of a chart model: one row per period plus the summary panel.

use super::util::{format_count, format_price, localize_decimal, map_locale};
use crate::engine::{ChartModel, ColorClass, format_change};
use std::fmt::Write;

/// Render `model` as an aligned text table.
///
/// Prices use `locale_tag` grouping and the `currency` suffix; percentages use its decimal
/// separator. The summary block is only printed when the model carries one (two points or more).
pub fn render_table(model: &ChartModel, locale_tag: &str, currency: &str) -> String {
    let (locale, dec_sep) = map_locale(locale_tag);
    let mut out = String::new();

    match model.label.as_deref() {
        Some(label) => {
            let _ = writeln!(out, "Market trend - {label}");
        }
        None => {
            let _ = writeln!(out, "Market trend");
        }
    }
    let _ = write!(
        out,
        "Based on {} sales",
        format_count(model.reported_total_sales, locale)
    );
    if model.outliers_excluded > 0 {
        let _ = write!(out, " ({} outliers excluded)", model.outliers_excluded);
    }
    out.push_str("\n\n");

    let prices: Vec<String> = model
        .bars
        .iter()
        .map(|b| format_price(b.value, locale, currency))
        .collect();
    let price_w = prices
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
        .max("Price/m²".chars().count());

    let _ = writeln!(
        out,
        "{:<8}{:>pw$}{:>10}{:>8}  trend",
        "Period",
        "Price/m²",
        "YoY",
        "Sales",
        pw = price_w + 2
    );
    for ((bar, ann), price) in model.bars.iter().zip(&model.annotations).zip(&prices) {
        let change = ann
            .change_label
            .as_deref()
            .map(|c| localize_decimal(c, dec_sep))
            .unwrap_or_else(|| "-".to_string());
        let pad = price_w + 2 - price.chars().count().min(price_w + 2);
        let marker = match ann.change_label {
            None => "",
            Some(_) => match bar.color_class {
                ColorClass::Positive => "up",
                ColorClass::Negative => "down",
            },
        };
        let _ = writeln!(
            out,
            "{:<8}{}{}{:>10}{:>8}  {}",
            ann.period_label,
            " ".repeat(pad),
            price,
            change,
            ann.sample_count,
            marker
        );
    }

    if let Some(s) = &model.summary {
        out.push('\n');
        let _ = writeln!(
            out,
            "Earliest ({}): {}/m²",
            s.earliest_period,
            format_price(s.earliest_value, locale, currency)
        );
        let _ = writeln!(
            out,
            "Latest ({}):   {}/m²",
            s.latest_period,
            format_price(s.latest_value, locale, currency)
        );
        let _ = writeln!(
            out,
            "Total change:  {}",
            localize_decimal(&format_change(s.total_change_percent), dec_sep)
        );
        let _ = writeln!(
            out,
            "Total sales analyzed: {}",
            format_count(s.total_samples, locale)
        );
    }
    out
}
