use crate::error::ChartError;
use serde::{Deserialize, Serialize};

/// One observation: the average price for a period (typically a year).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub period: i32,
    /// Average price per m² for the period.
    pub value: f64,
    pub sample_count: u32,
    /// Change against the previous point in percent. `None` for the earliest point.
    pub yoy_change_percent: Option<f64>,
}

/// Percentage change from `prev` to `next`. Undefined when `prev` is zero.
pub fn percent_change(prev: f64, next: f64) -> Option<f64> {
    if prev == 0.0 {
        None
    } else {
        Some((next - prev) / prev * 100.0)
    }
}

/// Ordered price history for one street or area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendSeries {
    /// Optional display label, e.g. a street name.
    pub label: Option<String>,
    pub points: Vec<TrendPoint>,
    /// Sum of `sample_count` over `points`.
    pub total_samples: u64,
    /// Observations dropped upstream before the series reached us.
    pub outliers_excluded: u32,
    /// Sales count as reported by the backend (`total_sales`). May differ from
    /// `total_samples` when the backend counts sales outside the plotted periods.
    pub reported_total_sales: u64,
}

impl TrendSeries {
    /// Build a series from already-annotated points.
    ///
    /// Periods must be strictly increasing. An empty point list is accepted here;
    /// the engine rejects it when asked to lay it out.
    pub fn new(
        label: Option<String>,
        points: Vec<TrendPoint>,
        outliers_excluded: u32,
    ) -> Result<Self, ChartError> {
        if let Some(w) = points.windows(2).find(|w| w[1].period <= w[0].period) {
            return Err(ChartError::MalformedSeries(format!(
                "periods must be strictly increasing ({} followed by {})",
                w[0].period, w[1].period
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(ChartError::MalformedSeries(format!(
                "non-finite value for period {}",
                p.period
            )));
        }
        let total_samples = points.iter().map(|p| p.sample_count as u64).sum();
        Ok(Self {
            label,
            points,
            total_samples,
            outliers_excluded,
            reported_total_sales: total_samples,
        })
    }

    /// Build a series from raw `(period, value, sample_count)` triples, deriving the
    /// year-over-year change of every point from its predecessor.
    ///
    /// A zero value followed by another point is `MalformedSeries`: the change would be undefined.
    pub fn from_observations(
        label: Option<String>,
        observations: &[(i32, f64, u32)],
        outliers_excluded: u32,
    ) -> Result<Self, ChartError> {
        let points = observations
            .iter()
            .enumerate()
            .map(|(i, &(period, value, sample_count))| {
                let yoy_change_percent = match i {
                    0 => None,
                    _ => {
                        let (prev_period, prev, _) = observations[i - 1];
                        let change = percent_change(prev, value).ok_or_else(|| {
                            ChartError::MalformedSeries(format!(
                                "zero value for period {prev_period} leaves the change to {period} undefined"
                            ))
                        })?;
                        Some(change)
                    }
                };
                Ok(TrendPoint {
                    period,
                    value,
                    sample_count,
                    yoy_change_percent,
                })
            })
            .collect::<Result<Vec<_>, ChartError>>()?;
        Self::new(label, points, outliers_excluded)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Target drawing area in abstract units (pixels).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Viewport {
    /// The plot area used by the property page: 600 x 200.
    fn default() -> Self {
        Self::new(600.0, 200.0)
    }
}

/// Market-trend document as returned by `GET /api/properties/{id}/market-trend`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketTrendDoc {
    pub years: Vec<i32>,
    pub average_prices: Vec<f64>,
    pub year_over_year_changes: Vec<f64>,
    pub sample_counts: Vec<u32>,
    #[serde(default)]
    pub street_name: Option<String>,
    /// Some backends serialize counters as strings; accept both.
    #[serde(default, deserialize_with = "de_u64_from_string_or_number")]
    pub total_sales: u64,
    #[serde(default, deserialize_with = "de_u64_from_string_or_number")]
    pub outliers_excluded: u64,
}

/// Serde helper: parse `u64` from either a JSON number or a string.
fn de_u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U64Visitor;

    impl<'de> Visitor<'de> for U64Visitor {
        type Value = u64;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a string or integer representing a non-negative count")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u64::try_from(v).map_err(|_| E::custom("negative value for a count"))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            s.trim().parse::<u64>().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U64Visitor)
}

impl TryFrom<MarketTrendDoc> for TrendSeries {
    type Error = ChartError;

    /// Zip the parallel arrays into points, index by index.
    ///
    /// All four arrays must have the same length. The first entry of
    /// `year_over_year_changes` is ignored: the earliest point has no predecessor.
    fn try_from(doc: MarketTrendDoc) -> Result<Self, Self::Error> {
        let n = doc.years.len();
        if doc.average_prices.len() != n {
            return Err(ChartError::MalformedSeries(format!(
                "{} years but {} average prices",
                n,
                doc.average_prices.len()
            )));
        }
        if doc.sample_counts.len() != n {
            return Err(ChartError::MalformedSeries(format!(
                "{} years but {} sample counts",
                n,
                doc.sample_counts.len()
            )));
        }
        if doc.year_over_year_changes.len() != n {
            return Err(ChartError::MalformedSeries(format!(
                "{} years but {} year-over-year changes",
                n,
                doc.year_over_year_changes.len()
            )));
        }

        let points = (0..n)
            .map(|i| TrendPoint {
                period: doc.years[i],
                value: doc.average_prices[i],
                sample_count: doc.sample_counts[i],
                yoy_change_percent: if i == 0 {
                    None
                } else {
                    Some(doc.year_over_year_changes[i])
                },
            })
            .collect();

        let outliers = u32::try_from(doc.outliers_excluded).map_err(|_| {
            ChartError::MalformedSeries(format!(
                "outliers_excluded out of range: {}",
                doc.outliers_excluded
            ))
        })?;
        let label = doc
            .street_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let mut series = TrendSeries::new(label, points, outliers)?;
        series.reported_total_sales = doc.total_sales;
        Ok(series)
    }
}

/// Parse a market-trend JSON document straight into a series.
pub fn parse_market_trend(json: &str) -> anyhow::Result<TrendSeries> {
    let doc: MarketTrendDoc = serde_json::from_str(json)?;
    Ok(TrendSeries::try_from(doc)?)
}
