//! Raw data preview grid.

use crate::data::PreviewTable;
use egui::{Color32, RichText, ScrollArea};

const MIN_COL_WIDTH: f32 = 80.0;

#[derive(Default)]
pub struct DataTable;

impl DataTable {
    pub fn show(&mut self, ui: &mut egui::Ui, table: &PreviewTable) {
        if table.is_empty() {
            ui.label(RichText::new("No rows").color(Color32::GRAY));
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::horizontal().show(ui, |ui| {
                    egui::Grid::new("raw_data_preview")
                        .striped(true)
                        .min_col_width(MIN_COL_WIDTH)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            ui.label(RichText::new("#").strong().size(12.0));
                            for column in &table.columns {
                                ui.label(RichText::new(column).strong().size(12.0));
                            }
                            ui.end_row();

                            for (i, row) in table.rows.iter().enumerate() {
                                ui.label(RichText::new(i.to_string()).size(12.0).color(Color32::GRAY));
                                for cell in row {
                                    match cell {
                                        Some(text) => ui.label(RichText::new(text).size(12.0)),
                                        None => ui.label(
                                            RichText::new("null").size(12.0).italics().color(Color32::GRAY),
                                        ),
                                    };
                                }
                                ui.end_row();
                            }
                        });
                });
            });
    }
}
