use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionStatus {
    #[serde(rename = "Resolved")]
    Resolved,
    #[serde(rename = "Not Resolved")]
    NotResolved,
}

impl ResolutionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ResolutionStatus::Resolved => "Resolved",
            ResolutionStatus::NotResolved => "Not Resolved",
        }
    }
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionCount {
    pub status: ResolutionStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Calendar day formatted as `MM/DD`.
    pub date: String,
    pub satisfaction_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionSatisfaction {
    pub status: ResolutionStatus,
    pub satisfaction_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetric {
    pub label: String,
    pub value_pct: f64,
}

impl SummaryMetric {
    /// Whole percentages print bare ("92%"), everything else with one decimal ("69.9%").
    pub fn display_value(&self) -> String {
        format_pct(self.value_pct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub name: String,
    #[serde(serialize_with = "serialize_value")]
    pub value: f64,
}

pub fn format_pct(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}%")
    } else {
        format!("{rounded:.1}%")
    }
}

// Counts travel as `f64` for the charts but export as whole numbers.
fn serialize_value<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_drop_trailing_zero_decimals() {
        assert_eq!(format_pct(92.0), "92%");
        assert_eq!(format_pct(28.0), "28%");
        assert_eq!(format_pct(82.5), "82.5%");
        assert_eq!(format_pct(69.9), "69.9%");
    }

    #[test]
    fn percentages_round_before_dropping_decimals() {
        assert_eq!(format_pct(99.96), "100%");
        assert_eq!(format_pct(91.999999), "92%");
        assert_eq!(format_pct(69.94), "69.9%");
    }

    #[test]
    fn whole_values_serialize_without_fraction() {
        let count = SeriesPoint {
            name: "Neutral".to_string(),
            value: 12.0,
        };
        let share = SeriesPoint {
            name: "07/16".to_string(),
            value: 88.2,
        };
        assert_eq!(
            serde_json::to_string(&count).unwrap(),
            r#"{"name":"Neutral","value":12}"#
        );
        assert_eq!(
            serde_json::to_string(&share).unwrap(),
            r#"{"name":"07/16","value":88.2}"#
        );
    }

    #[test]
    fn status_serializes_with_display_label() {
        let json = serde_json::to_string(&ResolutionStatus::NotResolved).unwrap();
        assert_eq!(json, "\"Not Resolved\"");
        assert_eq!(ResolutionStatus::Resolved.to_string(), "Resolved");
    }
}
