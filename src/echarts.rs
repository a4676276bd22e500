use charming::component::{Axis, Legend};
use charming::element::{
    AxisType, Color, ItemStyle, Label, LabelLine, LineStyle, LineStyleType, SplitLine, Tooltip,
    Trigger,
};
use charming::series::{Bar, Pie};
use charming::Chart;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde_json::json;

use crate::error::DashboardError;
use crate::models::SeriesPoint;
use crate::render::{ChartBackend, Dashboard, Panel, Slice, Tile};

pub const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

/// Draws the dashboard as an HTML page. Each chart panel becomes an ECharts
/// option document; ECharts owns layout, scaling, tooltips and legends.
#[derive(Debug, Clone)]
pub struct EchartsBackend {
    pub script_src: String,
}

impl Default for EchartsBackend {
    fn default() -> Self {
        Self {
            script_src: ECHARTS_CDN.to_string(),
        }
    }
}

impl ChartBackend for EchartsBackend {
    fn name(&self) -> &'static str {
        "echarts"
    }

    fn draw(&self, dashboard: &Dashboard) -> Result<String, DashboardError> {
        let mut sections = Vec::new();
        let mut charts = Vec::new();

        for (index, panel) in dashboard.panels.iter().enumerate() {
            let id = format!("panel-{index}");
            let chart = match panel {
                Panel::Pie {
                    slices,
                    outer_radius,
                    label_lines,
                    ..
                } => Some(pie_chart(slices, *outer_radius, *label_lines)),
                Panel::Bar {
                    points,
                    fill,
                    series_name,
                    domain,
                    dashed_grid,
                    ..
                } => Some(bar_chart(points, fill, series_name, *domain, *dashed_grid)),
                Panel::Tiles { .. } => None,
            };

            let body = match (panel, chart) {
                (Panel::Tiles { tiles, .. }, _) => tiles_markup(tiles),
                (_, Some(chart)) => {
                    let option = serde_json::to_value(&chart).map_err(|err| {
                        DashboardError::RenderDependencyUnavailable(err.to_string())
                    })?;
                    charts.push(json!({ "id": &id, "option": option }));
                    let size = format!(
                        "width:{}px;height:{}px",
                        dashboard.panel_width, dashboard.panel_height
                    );
                    html! { div id=(id) style=(size) {} }
                }
                (_, None) => html! {},
            };

            sections.push(html! {
                section {
                    h3 { (panel.title()) }
                    (body)
                }
            });
        }

        let payload = serde_json::to_string(&charts)
            .map_err(|err| DashboardError::RenderDependencyUnavailable(err.to_string()))?;
        // `</` inside the payload would close the script element early.
        let script = format!(
            "const charts = {};\nfor (const chart of charts) {{ echarts.init(document.getElementById(chart.id)).setOption(chart.option); }}",
            payload.replace("</", "<\\/")
        );

        let page = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (dashboard.title) }
                    script src=(self.script_src) {}
                    style { (PreEscaped(STYLE)) }
                }
                body {
                    h1 { (dashboard.title) }
                    div.grid {
                        @for section in &sections {
                            (section)
                        }
                    }
                    script { (PreEscaped(script)) }
                }
            }
        };

        Ok(page.into_string())
    }
}

const STYLE: &str = "body{font-family:sans-serif;max-width:72rem;margin:0 auto;padding:1rem}\
.grid{display:grid;grid-template-columns:repeat(2,minmax(0,1fr));gap:1.5rem}\
.tiles{display:grid;grid-template-columns:repeat(2,1fr);gap:1rem}\
.tile{border:1px solid #e5e7eb;border-radius:.5rem;padding:1.5rem}\
.tile .value{font-size:1.5rem;font-weight:700;color:#2563eb}\
.tile .label{font-size:.875rem;color:#4b5563}";

fn pie_chart(slices: &[Slice], outer_radius: u32, label_lines: bool) -> Chart {
    // Slice colors are already assigned by position, so the chart palette is
    // exactly one color per slice.
    let colors: Vec<Color> = slices
        .iter()
        .map(|slice| Color::from(slice.color.as_str()))
        .collect();
    let data: Vec<(f64, &str)> = slices
        .iter()
        .map(|slice| (slice.point.value, slice.point.name.as_str()))
        .collect();

    Chart::new()
        .color(colors)
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .series(
            Pie::new()
                .radius(f64::from(outer_radius))
                .label(Label::new().show(true).formatter("{b}: {c}"))
                .label_line(LabelLine::new().show(label_lines))
                .data(data),
        )
}

fn bar_chart(
    points: &[SeriesPoint],
    fill: &str,
    series_name: &str,
    domain: (f64, f64),
    dashed_grid: bool,
) -> Chart {
    let keys: Vec<String> = points.iter().map(|point| point.name.clone()).collect();
    let values: Vec<f64> = points.iter().map(|point| point.value).collect();

    Chart::new()
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new().bottom(0))
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(keys)
                .split_line(split_line(dashed_grid)),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .min(domain.0)
                .max(domain.1)
                .split_line(split_line(dashed_grid)),
        )
        .series(
            Bar::new()
                .name(series_name)
                .item_style(ItemStyle::new().color(fill))
                .data(values),
        )
}

fn split_line(dashed: bool) -> SplitLine {
    let line_type = if dashed {
        LineStyleType::Dashed
    } else {
        LineStyleType::Solid
    };
    SplitLine::new()
        .show(true)
        .line_style(LineStyle::new().type_(line_type))
}

fn tiles_markup(tiles: &[Tile]) -> Markup {
    html! {
        div.tiles {
            @for tile in tiles {
                div.tile {
                    div.value { (tile.display) }
                    div.label { (tile.label) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::render::{render_dashboard, RenderOptions};
    use crate::store::MetricStore;

    fn dashboard() -> Dashboard {
        render_dashboard(&MetricStore::default(), &RenderOptions::default())
    }

    fn embedded_charts(page: &str) -> Vec<Value> {
        let marker = "const charts = ";
        let start = page.find(marker).unwrap() + marker.len();
        let end = start + page[start..].find(";\n").unwrap();
        serde_json::from_str(&page[start..end].replace("<\\/", "</")).unwrap()
    }

    // Axes may serialize as a single object or as a one-element list.
    fn first(value: &Value) -> &Value {
        match value.as_array() {
            Some(items) => &items[0],
            None => value,
        }
    }

    #[test]
    fn embeds_one_chart_per_chart_panel() {
        let page = EchartsBackend::default().draw(&dashboard()).unwrap();
        let charts = embedded_charts(&page);
        assert_eq!(charts.len(), 3);
        for (index, chart) in charts.iter().enumerate() {
            let id = format!("panel-{index}");
            assert_eq!(chart["id"], id.as_str());
            assert!(page.contains(&format!(
                "<div id=\"{id}\" style=\"width:400px;height:300px\"></div>"
            )));
        }
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(ECHARTS_CDN));
    }

    #[test]
    fn pie_binds_categories_with_positional_colors() {
        let page = EchartsBackend::default().draw(&dashboard()).unwrap();
        let charts = embedded_charts(&page);
        let pie = &charts[0]["option"];
        let series = &pie["series"][0];
        assert_eq!(series["type"], "pie");
        let data = series["data"].as_array().unwrap();
        assert_eq!(data.len(), 5);
        assert_eq!(data[0]["name"], "Strongly Satisfied");
        assert_eq!(data[0]["value"].as_f64(), Some(169.0));
        assert_eq!(data[4]["name"], "Strongly Dissatisfied");
        assert_eq!(pie["color"][0], "#2563eb");
        assert_eq!(pie["color"][3], "#ef4444");
        assert_eq!(series["labelLine"]["show"], false);
        assert_eq!(series["radius"].as_f64(), Some(100.0));
    }

    #[test]
    fn resolution_bars_use_fixed_axis() {
        let page = EchartsBackend::default().draw(&dashboard()).unwrap();
        let charts = embedded_charts(&page);
        let bar = &charts[2]["option"];
        let y_axis = first(&bar["yAxis"]);
        assert_eq!(y_axis["min"].as_f64(), Some(0.0));
        assert_eq!(y_axis["max"].as_f64(), Some(100.0));
        assert_eq!(first(&bar["xAxis"])["data"][1], "Not Resolved");
        let heights: Vec<f64> = bar["series"][0]["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|value| value.as_f64().unwrap())
            .collect();
        assert_eq!(heights, vec![92.0, 28.0]);
        assert_eq!(bar["series"][0]["name"], "Satisfaction %");
    }

    #[test]
    fn tiles_render_as_html() {
        let page = EchartsBackend::default().draw(&dashboard()).unwrap();
        for value in ["82.5%", "69.9%", "92%", "28%"] {
            assert!(page.contains(&format!("<div class=\"value\">{value}</div>")));
        }
        assert!(page.contains("Satisfaction When Unresolved"));
    }

    #[test]
    fn titles_are_escaped() {
        let mut dashboard = dashboard();
        dashboard.title = "<b>CSAT & co</b>".to_string();
        let page = EchartsBackend::default().draw(&dashboard).unwrap();
        assert!(page.contains("<h1>&lt;b&gt;CSAT &amp; co&lt;/b&gt;</h1>"));
        assert!(!page.contains("<b>CSAT"));
    }
}
