//! Utility functions for rendering: class colours, locale mapping, price formatting.

use crate::engine::ColorClass;
use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

/// Bars and labels for non-negative changes (#10B981).
pub const POSITIVE_GREEN: RGBColor = RGBColor(16, 185, 129);
/// Bars and labels for negative changes (#EF4444).
pub const NEGATIVE_RED: RGBColor = RGBColor(239, 68, 68);
/// Trend line and point markers (#3B82F6).
pub const TREND_BLUE: RGBColor = RGBColor(59, 130, 246);
/// Dashed gridlines (#E5E7EB).
pub const GRID_GRAY: RGBColor = RGBColor(229, 231, 235);

/// Opacity of bars, as drawn on the property page.
pub const BAR_OPACITY: f64 = 0.7;
pub const TREND_OPACITY: f64 = 0.8;

/// Colour a renderer should use for a classification.
#[inline]
pub fn class_color(class: ColorClass) -> RGBColor {
    match class {
        ColorClass::Positive => POSITIVE_GREEN,
        ColorClass::Negative => NEGATIVE_RED,
    }
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `fr_FR`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().replace('-', "_").as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" | "french" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Whole-number price with locale grouping and a trailing currency symbol, e.g. `3,300 €`.
///
/// An empty `currency` leaves the number bare. Non-finite values print as `NA`.
pub fn format_price(value: f64, locale: &Locale, currency: &str) -> String {
    if !value.is_finite() {
        return "NA".to_string();
    }
    let n = (value.round() as i64).to_formatted_string(locale);
    if currency.is_empty() {
        n
    } else {
        format!("{n} {currency}")
    }
}

/// Swap the `.` decimal point of an already formatted number for the locale's separator.
pub fn localize_decimal(formatted: &str, dec_sep: char) -> String {
    if dec_sep == '.' {
        formatted.to_string()
    } else {
        formatted.replace('.', &dec_sep.to_string())
    }
}

/// Integer count with locale grouping.
pub fn format_count(count: u64, locale: &Locale) -> String {
    count.to_formatted_string(locale)
}

/// Split a horizontal line into dash segments of `dash` px separated by `gap` px.
///
/// Used for gridlines: plotters' plain path element has no dash pattern.
pub fn dash_segments(x0: i32, x1: i32, y: i32, dash: i32, gap: i32) -> Vec<[(i32, i32); 2]> {
    let dash = dash.max(1);
    let step = dash + gap.max(0);
    let mut out = Vec::new();
    let mut x = x0;
    while x < x1 {
        out.push([(x, y), ((x + dash).min(x1), y)]);
        x += step;
    }
    out
}
