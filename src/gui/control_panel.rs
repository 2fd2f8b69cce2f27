//! Control Panel Widget
//! Top bar with the dashboard title, data source and actions.

use egui::{Color32, RichText};
use std::path::Path;

/// Action requested from the control panel this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPanelAction {
    None,
    Reload,
    OpenCsv,
    ExportPngs,
}

/// Title row plus file controls and a status line.
pub struct ControlPanel {
    pub status: String,
    pub status_is_error: bool,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
            status_is_error: false,
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, status: &str) {
        self.status = status.to_string();
        self.status_is_error = true;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, csv_path: &Path) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("🔐 Login Activity Dashboard")
                    .size(24.0)
                    .strong()
                    .color(Color32::from_rgb(100, 149, 237)),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(self.export_enabled, egui::Button::new("🖼 Export PNGs…"))
                    .clicked()
                {
                    action = ControlPanelAction::ExportPngs;
                }
                if ui.button("📁 Open CSV…").clicked() {
                    action = ControlPanelAction::OpenCsv;
                }
                if ui.button("🔄 Reload").clicked() {
                    action = ControlPanelAction::Reload;
                }
            });
        });

        ui.horizontal(|ui| {
            let file_name = csv_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| csv_path.display().to_string());
            ui.label(RichText::new(format!("📄 {}", file_name)).size(12.0));

            ui.separator();

            let color = if self.status_is_error {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(&self.status).size(12.0).color(color));
        });
        ui.add_space(4.0);

        action
    }
}
