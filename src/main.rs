//! Login Activity Dashboard
//!
//! Loads a CSV of login events, aggregates it and shows metric tiles,
//! charts and a raw data preview. Also runs headless to print a JSON
//! summary or export the charts as PNG files.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::{Context, Result};
use charts::StaticChartRenderer;
use clap::Parser;
use config::Cli;
use eframe::egui;
use gui::DashboardApp;
use stats::StatsCalculator;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    config::setup_logging(&cli.log_level);

    if cli.is_headless() {
        return run_headless(&cli);
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Login Activity Dashboard"),
        ..Default::default()
    };

    let csv_path = cli.csv.clone();
    eframe::run_native(
        "Login Activity Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, csv_path)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {}", e))
}

fn run_headless(cli: &Cli) -> Result<()> {
    let report = StatsCalculator::run(&cli.csv)
        .with_context(|| format!("Could not build dashboard from {}", cli.csv.display()))?;

    if let Some(dir) = &cli.export {
        let paths = StaticChartRenderer::export_report(&report, dir)?;
        for path in paths {
            println!("{}", path.display());
        }
    } else {
        let json = serde_json::to_string_pretty(&report).context("Could not serialize report")?;
        println!("{}", json);
    }

    info!("Done");
    Ok(())
}
