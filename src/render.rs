use tracing::debug;

use crate::error::DashboardError;
use crate::models::SeriesPoint;
use crate::series::{self, Palette};
use crate::store::MetricStore;

/// Every option the dashboard customizes. Backends read these instead of
/// falling back to their own defaults.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    pub panel_width: u32,
    pub panel_height: u32,
    pub pie_outer_radius: u32,
    pub pie_label_lines: bool,
    pub bar_fill: String,
    pub bar_series_name: String,
    pub value_axis_domain: (f64, f64),
    pub dashed_grid: bool,
    pub palette: Palette,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Customer Satisfaction Analysis Dashboard".to_string(),
            panel_width: 400,
            panel_height: 300,
            pie_outer_radius: 100,
            pie_label_lines: false,
            bar_fill: "#2563eb".to_string(),
            bar_series_name: "Satisfaction %".to_string(),
            value_axis_domain: (0.0, 100.0),
            dashed_grid: true,
            palette: Palette::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub point: SeriesPoint,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub label: String,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Pie {
        title: String,
        slices: Vec<Slice>,
        outer_radius: u32,
        label_lines: bool,
    },
    Bar {
        title: String,
        points: Vec<SeriesPoint>,
        fill: String,
        series_name: String,
        domain: (f64, f64),
        dashed_grid: bool,
    },
    Tiles {
        title: String,
        tiles: Vec<Tile>,
    },
}

impl Panel {
    pub fn title(&self) -> &str {
        match self {
            Panel::Pie { title, .. } | Panel::Bar { title, .. } | Panel::Tiles { title, .. } => {
                title
            }
        }
    }
}

/// Renderable tree handed to a [`ChartBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub title: String,
    pub panel_width: u32,
    pub panel_height: u32,
    pub panels: Vec<Panel>,
}

pub trait ChartBackend {
    fn name(&self) -> &'static str;

    fn draw(&self, dashboard: &Dashboard) -> Result<String, DashboardError>;
}

pub fn render_dashboard(store: &MetricStore, options: &RenderOptions) -> Dashboard {
    let categories = series::category_series(store);
    let colors = options.palette.assign(categories.len());
    let slices: Vec<Slice> = categories
        .into_iter()
        .zip(colors)
        .map(|(point, color)| Slice { point, color })
        .collect();

    let bar = |title: &str, points: Vec<SeriesPoint>| Panel::Bar {
        title: title.to_string(),
        points,
        fill: options.bar_fill.clone(),
        series_name: options.bar_series_name.clone(),
        domain: options.value_axis_domain,
        dashed_grid: options.dashed_grid,
    };

    let tiles = store
        .summary()
        .iter()
        .map(|metric| Tile {
            label: metric.label.clone(),
            display: metric.display_value(),
        })
        .collect();

    let panels = vec![
        Panel::Pie {
            title: "Satisfaction Distribution".to_string(),
            slices,
            outer_radius: options.pie_outer_radius,
            label_lines: options.pie_label_lines,
        },
        bar("Daily Satisfaction Trends", series::trend_series(store)),
        bar(
            "Resolution Impact on Satisfaction",
            series::satisfaction_by_resolution_series(store),
        ),
        Panel::Tiles {
            title: "Key Metrics".to_string(),
            tiles,
        },
    ];

    debug!(panels = panels.len(), "dashboard composed");

    Dashboard {
        title: options.title.clone(),
        panel_width: options.panel_width,
        panel_height: options.panel_height,
        panels,
    }
}
