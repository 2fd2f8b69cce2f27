//! Login Dashboard Main Application
//! Main window with the control panel on top and the dashboard body below.

use crate::charts::StaticChartRenderer;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::{DashboardReport, StatsCalculator};
use egui::{Color32, RichText, TopBottomPanel};
use std::path::PathBuf;
use tracing::{error, info};

/// Outcome of the most recent pipeline run.
enum LoadState {
    Ready(DashboardReport),
    /// Fatal load error; nothing but the message is rendered.
    Failed(String),
}

/// Main application window.
pub struct DashboardApp {
    csv_path: PathBuf,
    state: LoadState,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, csv_path: PathBuf) -> Self {
        let mut app = Self {
            csv_path,
            state: LoadState::Failed(String::new()),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        app.reload();
        app
    }

    /// Rerun the whole pipeline from the current file.
    fn reload(&mut self) {
        match StatsCalculator::run(&self.csv_path) {
            Ok(report) => {
                self.control_panel.set_status(&format!(
                    "Loaded {} rows, {} columns",
                    report.totals.total,
                    report.preview.columns.len()
                ));
                self.control_panel.export_enabled = true;
                self.state = LoadState::Ready(report);
            }
            Err(e) => {
                error!(path = %self.csv_path.display(), "Dashboard load failed: {}", e);
                let message = format!("❌ {}", e);
                self.control_panel.set_error("Load failed");
                self.control_panel.export_enabled = false;
                self.state = LoadState::Failed(message);
            }
        }
    }

    /// Handle CSV file selection
    fn handle_open_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.csv_path = path;
            self.reload();
        }
    }

    /// Export the current charts as PNG files into a chosen folder
    fn handle_export_pngs(&mut self) {
        let LoadState::Ready(report) = &self.state else {
            self.control_panel.set_error("No charts to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        match StaticChartRenderer::export_report(report, &dir) {
            Ok(paths) => {
                self.control_panel.set_status(&format!(
                    "Exported {} charts to {}",
                    paths.len(),
                    dir.display()
                ));
                if let Err(e) = open::that(&dir) {
                    info!("Could not open export folder: {}", e);
                }
            }
            Err(e) => {
                error!("Chart export failed: {}", e);
                self.control_panel.set_error(&format!("Export error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top panel - Control Panel
        TopBottomPanel::top("control_panel").show(ctx, |ui| {
            let action = self.control_panel.show(ui, &self.csv_path);

            match action {
                ControlPanelAction::Reload => self.reload(),
                ControlPanelAction::OpenCsv => self.handle_open_csv(),
                ControlPanelAction::ExportPngs => self.handle_export_pngs(),
                ControlPanelAction::None => {}
            }
        });

        // Central panel - Dashboard or the single fatal error
        egui::CentralPanel::default().show(ctx, |ui| match &self.state {
            LoadState::Ready(report) => self.chart_viewer.show(ui, report),
            LoadState::Failed(message) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(message)
                            .size(18.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                });
            }
        });
    }
}
