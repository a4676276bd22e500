use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;
use crate::models::{
    CategoryCount, ResolutionCount, ResolutionSatisfaction, ResolutionStatus, SummaryMetric,
    TrendPoint,
};

pub const SATISFACTION_LEVELS: [&str; 5] = [
    "Strongly Satisfied",
    "Satisfied",
    "Neutral",
    "Dissatisfied",
    "Strongly Dissatisfied",
];

pub const SUMMARY_LABELS: [&str; 4] = [
    "Overall CSAT Score",
    "Issue Resolution Rate",
    "Satisfaction When Resolved",
    "Satisfaction When Unresolved",
];

/// Immutable dataset behind the dashboard. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStore {
    categories: Vec<CategoryCount>,
    resolution: Vec<ResolutionCount>,
    daily_trends: Vec<TrendPoint>,
    satisfaction_by_resolution: Vec<ResolutionSatisfaction>,
    summary: Vec<SummaryMetric>,
}

impl Default for MetricStore {
    fn default() -> Self {
        let categories = SATISFACTION_LEVELS.into_iter().zip([169, 28, 12, 15, 42]);

        let daily_trends = vec![
            ("07/12", 85.7),
            ("07/15", 82.4),
            ("07/16", 88.2),
            ("07/17", 79.5),
            ("07/18", 84.6),
            ("07/19", 77.8),
            ("07/22", 81.3),
            ("07/23", 80.0),
        ];

        let summary = SUMMARY_LABELS.into_iter().zip([82.5, 69.9, 92.0, 28.0]);

        Self {
            categories: categories
                .map(|(label, count)| CategoryCount {
                    label: label.to_string(),
                    count,
                })
                .collect(),
            resolution: vec![
                ResolutionCount {
                    status: ResolutionStatus::Resolved,
                    count: 186,
                },
                ResolutionCount {
                    status: ResolutionStatus::NotResolved,
                    count: 80,
                },
            ],
            daily_trends: daily_trends
                .into_iter()
                .map(|(date, satisfaction_pct)| TrendPoint {
                    date: date.to_string(),
                    satisfaction_pct,
                })
                .collect(),
            satisfaction_by_resolution: vec![
                ResolutionSatisfaction {
                    status: ResolutionStatus::Resolved,
                    satisfaction_pct: 92.0,
                },
                ResolutionSatisfaction {
                    status: ResolutionStatus::NotResolved,
                    satisfaction_pct: 28.0,
                },
            ],
            summary: summary
                .map(|(label, value_pct)| SummaryMetric {
                    label: label.to_string(),
                    value_pct,
                })
                .collect(),
        }
    }
}

impl MetricStore {
    pub fn from_json_str(raw: &str) -> Result<Self, DashboardError> {
        let store: MetricStore = serde_json::from_str(raw)
            .map_err(|err| DashboardError::MalformedInput(err.to_string()))?;
        store.validate()?;
        Ok(store)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;
        let store = Self::from_json_str(&raw)
            .with_context(|| format!("invalid dataset {}", path.display()))?;
        Ok(store)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn categories(&self) -> &[CategoryCount] {
        &self.categories
    }

    pub fn resolution(&self) -> &[ResolutionCount] {
        &self.resolution
    }

    pub fn daily_trends(&self) -> &[TrendPoint] {
        &self.daily_trends
    }

    pub fn satisfaction_by_resolution(&self) -> &[ResolutionSatisfaction] {
        &self.satisfaction_by_resolution
    }

    pub fn summary(&self) -> &[SummaryMetric] {
        &self.summary
    }

    pub fn respondents(&self) -> u64 {
        self.categories.iter().map(|category| category.count).sum()
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.categories.is_empty() {
            return Err(DashboardError::EmptySeries("categories"));
        }
        ensure_label_set(
            "categories",
            self.categories.iter().map(|category| category.label.as_str()),
            &SATISFACTION_LEVELS,
        )?;

        if self.resolution.is_empty() {
            return Err(DashboardError::EmptySeries("resolution"));
        }
        ensure_one_per_status("resolution", self.resolution.iter().map(|r| r.status))?;

        if self.daily_trends.is_empty() {
            return Err(DashboardError::EmptySeries("daily_trends"));
        }
        let mut previous: Option<NaiveDate> = None;
        for point in &self.daily_trends {
            ensure_pct(&point.date, point.satisfaction_pct)?;
            let day = parse_day(&point.date)?;
            if previous.is_some_and(|prev| day <= prev) {
                return Err(DashboardError::MalformedInput(format!(
                    "trend date {} is not after the previous day",
                    point.date
                )));
            }
            previous = Some(day);
        }

        if self.satisfaction_by_resolution.is_empty() {
            return Err(DashboardError::EmptySeries("satisfaction_by_resolution"));
        }
        ensure_one_per_status(
            "satisfaction_by_resolution",
            self.satisfaction_by_resolution.iter().map(|r| r.status),
        )?;
        for entry in &self.satisfaction_by_resolution {
            ensure_pct(entry.status.label(), entry.satisfaction_pct)?;
        }

        ensure_label_set(
            "summary",
            self.summary.iter().map(|metric| metric.label.as_str()),
            &SUMMARY_LABELS,
        )?;
        for metric in &self.summary {
            ensure_pct(&metric.label, metric.value_pct)?;
        }

        Ok(())
    }
}

/// Labels must be exactly `expected`, each once, in any order.
fn ensure_label_set<'a>(
    series: &str,
    labels: impl Iterator<Item = &'a str>,
    expected: &[&str],
) -> Result<(), DashboardError> {
    let mut seen = HashSet::new();
    for label in labels {
        if !expected.contains(&label) {
            return Err(DashboardError::MalformedInput(format!(
                "{series}: unexpected label `{label}`"
            )));
        }
        if !seen.insert(label) {
            return Err(DashboardError::MalformedInput(format!(
                "{series}: duplicate label `{label}`"
            )));
        }
    }
    if let Some(missing) = expected.iter().find(|label| !seen.contains(*label)) {
        return Err(DashboardError::MalformedInput(format!(
            "{series}: missing label `{missing}`"
        )));
    }
    Ok(())
}

fn ensure_pct(label: &str, value: f64) -> Result<(), DashboardError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(DashboardError::MalformedInput(format!(
            "{label}: {value} is outside 0-100"
        )))
    }
}

fn ensure_one_per_status(
    series: &str,
    statuses: impl Iterator<Item = ResolutionStatus>,
) -> Result<(), DashboardError> {
    let statuses: Vec<ResolutionStatus> = statuses.collect();
    let resolved = statuses
        .iter()
        .filter(|status| **status == ResolutionStatus::Resolved)
        .count();
    let unresolved = statuses.len() - resolved;
    if resolved != 1 || unresolved != 1 {
        return Err(DashboardError::MalformedInput(format!(
            "{series} needs exactly one Resolved and one Not Resolved entry"
        )));
    }
    Ok(())
}

// Trend labels carry no year; anchor them on a leap year so 02/29 parses.
fn parse_day(label: &str) -> Result<NaiveDate, DashboardError> {
    NaiveDate::parse_from_str(&format!("2000/{label}"), "%Y/%m/%d").map_err(|_| {
        DashboardError::MalformedInput(format!("trend date `{label}` is not MM/DD"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(label: &str, count: u64) -> CategoryCount {
        CategoryCount {
            label: label.to_string(),
            count,
        }
    }

    fn edited(edit: impl FnOnce(&mut MetricStore)) -> Result<(), DashboardError> {
        let mut store = MetricStore::default();
        edit(&mut store);
        store.validate()
    }

    #[test]
    fn default_dataset_is_valid() {
        let store = MetricStore::default();
        assert!(store.validate().is_ok());
        assert_eq!(store.categories().len(), 5);
        assert_eq!(store.daily_trends().len(), 8);
        assert_eq!(store.summary().len(), 4);
        assert_eq!(store.respondents(), 266);
    }

    #[test]
    fn rejects_empty_categories() {
        let result = edited(|store| store.categories.clear());
        assert!(matches!(result, Err(DashboardError::EmptySeries("categories"))));
    }

    #[test]
    fn rejects_duplicate_category_labels() {
        let result = edited(|store| {
            store.categories = vec![category("Neutral", 3), category("Neutral", 4)];
        });
        assert!(matches!(result, Err(DashboardError::MalformedInput(_))));
    }

    #[test]
    fn rejects_categories_outside_the_satisfaction_levels() {
        let result = edited(|store| store.categories = vec![category("Bogus", 1)]);
        assert!(matches!(result, Err(DashboardError::MalformedInput(_))));
    }

    #[test]
    fn rejects_missing_satisfaction_level() {
        let result = edited(|store| {
            store.categories.pop();
        });
        assert!(matches!(result, Err(DashboardError::MalformedInput(_))));
    }

    #[test]
    fn accepts_satisfaction_levels_in_any_order() {
        let result = edited(|store| store.categories.reverse());
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_unknown_summary_label() {
        let result = edited(|store| store.summary[0].label = "Anything".to_string());
        assert!(matches!(result, Err(DashboardError::MalformedInput(_))));
    }

    #[test]
    fn rejects_out_of_order_trend_dates() {
        let result = edited(|store| store.daily_trends.swap(0, 1));
        assert!(matches!(result, Err(DashboardError::MalformedInput(_))));
    }

    #[test]
    fn rejects_trend_dates_that_are_not_days() {
        let result = edited(|store| store.daily_trends[0].date = "13/40".to_string());
        assert!(matches!(result, Err(DashboardError::MalformedInput(_))));
    }

    #[test]
    fn rejects_percentages_outside_range() {
        let result = edited(|store| store.summary[0].value_pct = 120.0);
        assert!(matches!(result, Err(DashboardError::MalformedInput(_))));
    }

    #[test]
    fn rejects_missing_resolution_status() {
        let result = edited(|store| store.resolution.truncate(1));
        assert!(matches!(result, Err(DashboardError::MalformedInput(_))));
    }

    #[test]
    fn json_dump_loads_back_unchanged() {
        let store = MetricStore::default();
        let raw = store.to_json().unwrap();
        let loaded = MetricStore::from_json_str(&raw).unwrap();
        assert_eq!(loaded, store);
        let labels: Vec<&str> = loaded
            .categories()
            .iter()
            .map(|category| category.label.as_str())
            .collect();
        assert_eq!(labels[0], "Strongly Satisfied");
        assert_eq!(labels[4], "Strongly Dissatisfied");
    }

    #[test]
    fn unparsable_json_is_malformed_input() {
        let result = MetricStore::from_json_str("{\"categories\": 3}");
        assert!(matches!(result, Err(DashboardError::MalformedInput(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("csat-dashboard-missing-dataset.json");
        let err = MetricStore::load(&path).unwrap_err();
        assert!(err.to_string().contains("failed to read dataset"));
    }
}
