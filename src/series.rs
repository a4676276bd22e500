use crate::error::DashboardError;
use crate::models::SeriesPoint;
use crate::store::MetricStore;

pub const DEFAULT_PALETTE: [&str; 5] = ["#2563eb", "#60a5fa", "#93c5fd", "#ef4444", "#dc2626"];

/// Turns an ordered label→count mapping into chart records, one per entry, in iteration order.
/// Values are copied as-is; an empty mapping gives an empty series.
pub fn build_series<I, K, V>(mapping: I) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<f64>,
{
    mapping
        .into_iter()
        .map(|(name, value)| SeriesPoint {
            name: name.into(),
            value: value.into(),
        })
        .collect()
}

pub fn category_series(store: &MetricStore) -> Vec<SeriesPoint> {
    build_series(
        store
            .categories()
            .iter()
            .map(|category| (category.label.as_str(), category.count as f64)),
    )
}

pub fn resolution_series(store: &MetricStore) -> Vec<SeriesPoint> {
    build_series(
        store
            .resolution()
            .iter()
            .map(|entry| (entry.status.label(), entry.count as f64)),
    )
}

pub fn trend_series(store: &MetricStore) -> Vec<SeriesPoint> {
    build_series(
        store
            .daily_trends()
            .iter()
            .map(|point| (point.date.as_str(), point.satisfaction_pct)),
    )
}

pub fn satisfaction_by_resolution_series(store: &MetricStore) -> Vec<SeriesPoint> {
    build_series(
        store
            .satisfaction_by_resolution()
            .iter()
            .map(|entry| (entry.status.label(), entry.satisfaction_pct)),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Result<Self, DashboardError> {
        if colors.is_empty() {
            return Err(DashboardError::EmptySeries("palette"));
        }
        if colors.iter().any(|color| color.trim().is_empty()) {
            return Err(DashboardError::MalformedInput(
                "palette contains a blank color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Positional and cyclic: entry `i` gets `colors[i % len]`.
    pub fn color_at(&self, position: usize) -> &str {
        &self.colors[position % self.colors.len()]
    }

    pub fn assign(&self, count: usize) -> Vec<String> {
        (0..count)
            .map(|position| self.color_at(position).to_string())
            .collect()
    }
}
