use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};

mod echarts;
mod error;
mod export;
mod models;
mod render;
mod report;
mod series;
mod store;

use echarts::EchartsBackend;
use export::SeriesKind;
use render::{ChartBackend, RenderOptions};
use report::ReportBackend;
use series::Palette;
use store::MetricStore;

#[derive(Parser)]
#[command(name = "csat-dashboard")]
#[command(about = "Customer satisfaction dashboard renderer", long_about = None)]
struct Cli {
    /// JSON dataset to use instead of the built-in survey figures
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Comma-separated colors assigned to pie slices by position
    #[arg(long, value_delimiter = ',', global = true)]
    palette: Vec<String>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the dashboard as an ECharts HTML page
    Render {
        #[arg(long, default_value = "dashboard.html")]
        out: PathBuf,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "dashboard.md")]
        out: PathBuf,
    },
    /// Export one chart series to CSV
    Export {
        #[arg(long, value_enum, default_value_t = SeriesKind::Categories)]
        series: SeriesKind,
        #[arg(long)]
        csv: PathBuf,
    },
    /// Write the active dataset as JSON
    DumpData {
        #[arg(long, default_value = "data.json")]
        out: PathBuf,
    },
    /// Print the key metrics and satisfaction distribution
    Summary,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let store = match &cli.data {
        Some(path) => {
            info!(path = %path.display(), "loading dataset");
            MetricStore::load(path)?
        }
        None => {
            debug!("using built-in dataset");
            MetricStore::default()
        }
    };

    let options = render_options(cli.palette)?;

    match cli.command {
        Commands::Render { out } => {
            draw_to(&EchartsBackend::default(), &store, &options, &out)?;
            println!("Dashboard written to {}.", out.display());
        }
        Commands::Report { out } => {
            draw_to(&ReportBackend, &store, &options, &out)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { series, csv } => {
            let points = series.points(&store);
            let written = export::write_csv(&points, &csv)
                .with_context(|| format!("failed to write {}", csv.display()))?;
            println!("Exported {written} points to {}.", csv.display());
        }
        Commands::DumpData { out } => {
            std::fs::write(&out, store.to_json()?)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Dataset written to {}.", out.display());
        }
        Commands::Summary => {
            println!("Key metrics:");
            for metric in store.summary() {
                println!("- {} {}", metric.display_value(), metric.label);
            }
            println!("Satisfaction distribution ({} responses):", store.respondents());
            for point in series::category_series(&store) {
                println!("- {}: {}", point.name, point.value);
            }
        }
    }

    Ok(())
}

fn render_options(palette: Vec<String>) -> anyhow::Result<RenderOptions> {
    let mut options = RenderOptions::default();
    if !palette.is_empty() {
        options.palette = Palette::new(palette).context("invalid --palette")?;
    }
    Ok(options)
}

fn draw_to(
    backend: &dyn ChartBackend,
    store: &MetricStore,
    options: &RenderOptions,
    out: &Path,
) -> anyhow::Result<()> {
    let dashboard = render::render_dashboard(store, options);
    let output = backend
        .draw(&dashboard)
        .with_context(|| format!("{} backend failed", backend.name()))?;
    info!(
        backend = backend.name(),
        panels = dashboard.panels.len(),
        bytes = output.len(),
        "dashboard drawn"
    );
    std::fs::write(out, output).with_context(|| format!("failed to write {}", out.display()))?;
    Ok(())
}
