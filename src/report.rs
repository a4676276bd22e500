use std::fmt::Write;

use crate::error::DashboardError;
use crate::render::{ChartBackend, Dashboard, Panel};

const BAR_WIDTH: f64 = 30.0;

/// Plain Markdown rendition of the dashboard, one section per panel.
#[derive(Debug, Clone, Default)]
pub struct ReportBackend;

impl ChartBackend for ReportBackend {
    fn name(&self) -> &'static str {
        "report"
    }

    fn draw(&self, dashboard: &Dashboard) -> Result<String, DashboardError> {
        Ok(build_report(dashboard))
    }
}

pub fn build_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# {}", dashboard.title);

    for panel in &dashboard.panels {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", panel.title());

        match panel {
            Panel::Pie { slices, .. } => {
                let total: f64 = slices.iter().map(|slice| slice.point.value).sum();
                if slices.is_empty() || total <= 0.0 {
                    let _ = writeln!(output, "No responses recorded.");
                    continue;
                }
                for slice in slices {
                    let share = slice.point.value / total * 100.0;
                    let _ = writeln!(
                        output,
                        "- {}: {} ({:.1}%) `{}` {}",
                        slice.point.name,
                        slice.point.value,
                        share,
                        text_bar(share, 100.0),
                        slice.color
                    );
                }
            }
            Panel::Bar {
                points,
                series_name,
                domain,
                ..
            } => {
                if points.is_empty() {
                    let _ = writeln!(output, "No data points.");
                    continue;
                }
                let _ = writeln!(output, "{series_name} on a {}-{} scale", domain.0, domain.1);
                let _ = writeln!(output);
                for point in points {
                    let _ = writeln!(
                        output,
                        "- {}: {:.1} `{}`",
                        point.name,
                        point.value,
                        text_bar(point.value - domain.0, domain.1 - domain.0)
                    );
                }
            }
            Panel::Tiles { tiles, .. } => {
                for tile in tiles {
                    let _ = writeln!(output, "- **{}** {}", tile.display, tile.label);
                }
            }
        }
    }

    output
}

fn text_bar(value: f64, span: f64) -> String {
    if span <= 0.0 {
        return String::new();
    }
    let filled = ((value / span).clamp(0.0, 1.0) * BAR_WIDTH).round() as usize;
    "█".repeat(filled)
}
