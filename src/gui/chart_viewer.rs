//! Chart Viewer Widget
//! Scrollable dashboard body: metric tiles, chart cards and the raw data preview.
//! Chart cards wrap into as many columns as the available width allows.

use crate::charts::ChartPlotter;
use crate::gui::DataTable;
use crate::stats::{DashboardReport, LoginTotals};
use egui::{Color32, RichText, ScrollArea};

const CHART_SPACING: f32 = 15.0;
const CHART_WIDTH: f32 = 620.0; // Fixed width for each chart card
const TILE_HEIGHT: f32 = 80.0;

/// Which chart a card draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Card {
    Status,
    Timeline,
    Devices,
    Locations,
}

impl Card {
    fn title(self) -> &'static str {
        match self {
            Card::Status => "Success vs Failed Logins",
            Card::Timeline => "Logins Over Time",
            Card::Devices => "Device Breakdown",
            Card::Locations => "Logins by Location",
        }
    }
}

#[derive(Default)]
pub struct ChartViewer {
    data_table: DataTable,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    fn cards(report: &DashboardReport) -> Vec<Card> {
        let mut cards = vec![Card::Status];
        if report.timeline.is_some() {
            cards.push(Card::Timeline);
        }
        if report.devices.is_some() {
            cards.push(Card::Devices);
        }
        if report.locations.is_some() {
            cards.push(Card::Locations);
        }
        cards
    }

    /// Draw the full dashboard for a report
    pub fn show(&mut self, ui: &mut egui::Ui, report: &DashboardReport) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::draw_metric_tiles(ui, &report.totals);

                ui.add_space(CHART_SPACING);
                ui.separator();
                ui.add_space(CHART_SPACING);

                // Calculate how many columns fit in available width
                let avail_width = ui.available_width();
                let num_columns =
                    ((avail_width / (CHART_WIDTH + CHART_SPACING)).floor() as usize).max(1);

                for row in Self::cards(report).chunks(num_columns) {
                    ui.horizontal(|ui| {
                        for card in row {
                            Self::draw_chart_card(ui, report, *card);
                            ui.add_space(CHART_SPACING);
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }

                ui.separator();
                ui.label(RichText::new("📄 Raw Data Preview").size(18.0).strong());
                ui.add_space(6.0);
                self.data_table.show(ui, &report.preview);
            });
    }

    fn draw_metric_tiles(ui: &mut egui::Ui, totals: &LoginTotals) {
        let tiles = [
            ("📊 Total Logins", totals.total, Color32::from_rgb(52, 152, 219)),
            ("✅ Successful Logins", totals.success, Color32::from_rgb(40, 167, 69)),
            ("❌ Failed Logins", totals.failed, Color32::from_rgb(220, 53, 69)),
        ];

        ui.columns(tiles.len(), |columns| {
            for (ui, (label, value, color)) in columns.iter_mut().zip(tiles) {
                egui::Frame::none()
                    .rounding(8.0)
                    .stroke(egui::Stroke::new(2.0, color))
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_min_height(TILE_HEIGHT);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(label).size(14.0));
                            ui.label(
                                RichText::new(value.to_string())
                                    .size(32.0)
                                    .strong()
                                    .color(color),
                            );
                        });
                    });
            }
        });
    }

    fn draw_chart_card(ui: &mut egui::Ui, report: &DashboardReport, card: Card) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(CHART_WIDTH - 24.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(card.title()).size(16.0).strong());
                    ui.add_space(8.0);

                    match card {
                        Card::Status => ChartPlotter::draw_status_chart(ui, &report.status),
                        Card::Timeline => {
                            if let Some(timeline) = &report.timeline {
                                ChartPlotter::draw_timeline_chart(ui, timeline);
                                if timeline.coerced > 0 {
                                    ui.label(
                                        RichText::new(format!(
                                            "⚠ {} unparseable timestamp(s) left out",
                                            timeline.coerced
                                        ))
                                        .size(11.0)
                                        .color(Color32::from_rgb(243, 156, 18)),
                                    );
                                }
                            }
                        }
                        Card::Devices => {
                            if let Some(devices) = &report.devices {
                                ChartPlotter::draw_device_chart(ui, devices);
                            }
                        }
                        Card::Locations => {
                            if let Some(locations) = &report.locations {
                                ChartPlotter::draw_location_chart(ui, locations);
                            }
                        }
                    }
                });
            });
    }
}
