//! Chart Plotter Module
//! Draws the dashboard charts interactively using egui_plot.

use crate::stats::{Breakdown, TimeSeries};
use chrono::{Datelike, NaiveDate};
use egui::{Color32, Stroke};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};
use std::f64::consts::TAU;

pub const SUCCESS_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green
pub const FAILED_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
    Color32::from_rgb(205, 220, 57),  // Lime
];

const CHART_HEIGHT: f32 = 280.0;
// Points per full turn when tessellating a pie slice
const PIE_RESOLUTION: f64 = 180.0;

/// One wedge of a pie chart, angles in radians starting at 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub start: f64,
    pub end: f64,
}

impl PieSlice {
    pub fn fraction(&self) -> f64 {
        (self.end - self.start) / TAU
    }
}

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for a status value; known statuses get fixed colors.
    pub fn status_color(status: &str, index: usize) -> Color32 {
        match status.to_lowercase().as_str() {
            "success" => SUCCESS_COLOR,
            "failed" => FAILED_COLOR,
            _ => PALETTE[index % PALETTE.len()],
        }
    }

    pub fn category_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Split a breakdown into pie wedges proportional to the counts.
    pub fn pie_slices(breakdown: &Breakdown) -> Vec<PieSlice> {
        let total = breakdown.counted();
        if total == 0 {
            return Vec::new();
        }

        let mut start = 0.0;
        breakdown
            .entries
            .iter()
            .map(|(label, count)| {
                let end = start + TAU * (*count as f64 / total as f64);
                let slice = PieSlice {
                    label: label.clone(),
                    count: *count,
                    start,
                    end,
                };
                start = end;
                slice
            })
            .collect()
    }

    fn wedge_points(slice: &PieSlice) -> Vec<[f64; 2]> {
        let steps = (((slice.end - slice.start) / TAU) * PIE_RESOLUTION).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push([0.0, 0.0]);
        for i in 0..=steps {
            let angle = slice.start + (slice.end - slice.start) * i as f64 / steps as f64;
            // Clockwise from the top, like a clock face
            points.push([angle.sin(), angle.cos()]);
        }
        points
    }

    /// Date ↔ plot x-coordinate
    pub fn date_to_x(date: NaiveDate) -> f64 {
        date.num_days_from_ce() as f64
    }

    pub fn x_to_date(x: f64) -> Option<NaiveDate> {
        if (x - x.round()).abs() > 1e-6 {
            return None;
        }
        NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
    }

    /// Bar per status, colored by status.
    pub fn draw_status_chart(ui: &mut egui::Ui, status: &Breakdown) {
        let labels: Vec<String> = status.entries.iter().map(|(s, _)| s.clone()).collect();

        Plot::new("status_chart")
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("Login Status")
            .y_axis_label("Count")
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                for (i, (value, count)) in status.entries.iter().enumerate() {
                    let color = Self::status_color(value, i);
                    let bar = Bar::new(i as f64, *count as f64)
                        .width(0.6)
                        .name(value)
                        .fill(color.gamma_multiply(0.8));
                    plot_ui.bar_chart(BarChart::new(vec![bar]).name(value).color(color));
                    plot_ui.text(Text::new(
                        PlotPoint::new(i as f64, *count as f64),
                        count.to_string(),
                    ));
                }
            });
    }

    /// One line per status across dates.
    pub fn draw_timeline_chart(ui: &mut egui::Ui, timeline: &TimeSeries) {
        Plot::new("timeline_chart")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("Date")
            .y_axis_label("Count")
            .x_axis_formatter(|mark, _range| {
                Self::x_to_date(mark.value)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for (i, status) in timeline.statuses().into_iter().enumerate() {
                    let color = Self::status_color(status, i);
                    let points: Vec<[f64; 2]> = timeline
                        .for_status(status)
                        .map(|p| [Self::date_to_x(p.date), p.count as f64])
                        .collect();

                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(points.iter().copied()))
                            .color(color)
                            .width(2.0)
                            .name(status),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(points.iter().copied()))
                            .radius(3.0)
                            .color(color),
                    );
                }
            });
    }

    /// Pie of device shares.
    pub fn draw_device_chart(ui: &mut egui::Ui, devices: &Breakdown) {
        let slices = Self::pie_slices(devices);

        Plot::new("device_chart")
            .height(CHART_HEIGHT)
            .data_aspect(1.0)
            .legend(Legend::default())
            .show_axes(false)
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(-1.2)
            .include_x(1.2)
            .include_y(-1.2)
            .include_y(1.2)
            .show(ui, |plot_ui| {
                for (i, slice) in slices.iter().enumerate() {
                    let color = Self::category_color(i);
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(Self::wedge_points(slice)))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(&slice.label),
                    );

                    let mid = (slice.start + slice.end) / 2.0;
                    plot_ui.text(Text::new(
                        PlotPoint::new(0.65 * mid.sin(), 0.65 * mid.cos()),
                        format!("{:.1}%", slice.fraction() * 100.0),
                    ));
                }
            });
    }

    /// Bar per location.
    pub fn draw_location_chart(ui: &mut egui::Ui, locations: &Breakdown) {
        let labels: Vec<String> = locations.entries.iter().map(|(l, _)| l.clone()).collect();

        Plot::new("location_chart")
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("Location")
            .y_axis_label("Count")
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                let bars: Vec<Bar> = locations
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, (location, count))| {
                        Bar::new(i as f64, *count as f64)
                            .width(0.6)
                            .name(location)
                            .fill(PALETTE[0])
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name("Logins").color(PALETTE[0]));

                for (i, (_, count)) in locations.entries.iter().enumerate() {
                    plot_ui.text(Text::new(
                        PlotPoint::new(i as f64, *count as f64),
                        count.to_string(),
                    ));
                }
            });
    }

    fn category_label(labels: &[String], value: f64) -> String {
        if value < 0.0 || (value - value.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(value.round() as usize).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(entries: &[(&str, usize)]) -> Breakdown {
        Breakdown {
            entries: entries.iter().map(|(v, n)| (v.to_string(), *n)).collect(),
            missing: 0,
        }
    }

    #[test]
    fn pie_slices_cover_full_circle() {
        let slices = ChartPlotter::pie_slices(&breakdown(&[("mobile", 3), ("desktop", 1)]));
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].start, 0.0);
        assert!((slices[0].fraction() - 0.75).abs() < 1e-9);
        assert_eq!(slices[0].end, slices[1].start);
        assert!((slices[1].end - TAU).abs() < 1e-9);
    }

    #[test]
    fn empty_breakdown_has_no_slices() {
        assert!(ChartPlotter::pie_slices(&Breakdown::default()).is_empty());
    }

    #[test]
    fn wedge_starts_at_center() {
        let slices = ChartPlotter::pie_slices(&breakdown(&[("only", 1)]));
        let points = ChartPlotter::wedge_points(&slices[0]);
        assert_eq!(points[0], [0.0, 0.0]);
        assert!(points.len() > PIE_RESOLUTION as usize);
    }

    #[test]
    fn date_axis_round_trips_whole_days() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let x = ChartPlotter::date_to_x(date);
        assert_eq!(ChartPlotter::x_to_date(x), Some(date));
        assert_eq!(ChartPlotter::x_to_date(x + 0.5), None);
    }

    #[test]
    fn known_statuses_have_fixed_colors() {
        assert_eq!(ChartPlotter::status_color("SUCCESS", 3), SUCCESS_COLOR);
        assert_eq!(ChartPlotter::status_color("failed", 0), FAILED_COLOR);
        assert_eq!(ChartPlotter::status_color("locked", 1), PALETTE[1]);
    }

    #[test]
    fn category_labels_only_on_whole_ticks() {
        let labels = vec!["NYC".to_string(), "LA".to_string()];
        assert_eq!(ChartPlotter::category_label(&labels, 1.0), "LA");
        assert_eq!(ChartPlotter::category_label(&labels, 0.5), "");
        assert_eq!(ChartPlotter::category_label(&labels, 5.0), "");
        assert_eq!(ChartPlotter::category_label(&labels, -1.0), "");
    }
}
