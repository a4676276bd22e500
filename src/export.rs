use std::path::Path;

use clap::ValueEnum;

use crate::models::SeriesPoint;
use crate::series;
use crate::store::MetricStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeriesKind {
    Categories,
    Resolution,
    Trend,
    ByResolution,
}

impl SeriesKind {
    pub fn points(self, store: &MetricStore) -> Vec<SeriesPoint> {
        match self {
            SeriesKind::Categories => series::category_series(store),
            SeriesKind::Resolution => series::resolution_series(store),
            SeriesKind::Trend => series::trend_series(store),
            SeriesKind::ByResolution => series::satisfaction_by_resolution_series(store),
        }
    }
}

pub fn write_csv(points: &[SeriesPoint], csv_path: &Path) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_path(csv_path)?;
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(points.len())
}
