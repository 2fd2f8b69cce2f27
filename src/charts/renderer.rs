//! Static Chart Renderer
//! Writes the dashboard charts to PNG files with plotters.
//!
//! One image per chart the report carries:
//! 1. status.png    - Success vs Failed Logins (bar)
//! 2. timeline.png  - Logins Over Time (line per status)
//! 3. devices.png   - Device Breakdown (pie)
//! 4. locations.png - Logins by Location (bar)

use crate::charts::plotter::{ChartPlotter, PALETTE};
use crate::stats::{Breakdown, DashboardReport, TimeSeries};
use chrono::NaiveDate;
use egui::Color32;
use plotters::coord::ranged1d::SegmentValue;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Drawing failed: {0}")]
    Drawing(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(err.to_string())
    }
}

/// Chart kinds in dashboard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Status,
    Timeline,
    Devices,
    Locations,
}

impl ChartKind {
    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::Status => "status.png",
            ChartKind::Timeline => "timeline.png",
            ChartKind::Devices => "devices.png",
            ChartKind::Locations => "locations.png",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Status => "Success vs Failed Logins",
            ChartKind::Timeline => "Logins Over Time",
            ChartKind::Devices => "Device Breakdown",
            ChartKind::Locations => "Logins by Location",
        }
    }
}

fn rgb(color: Color32) -> RGBColor {
    RGBColor(color.r(), color.g(), color.b())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Charts the report can produce; absent aggregates have no chart.
    pub fn planned_charts(report: &DashboardReport) -> Vec<ChartKind> {
        let mut kinds = vec![ChartKind::Status];
        if report.timeline.is_some() {
            kinds.push(ChartKind::Timeline);
        }
        if report.devices.is_some() {
            kinds.push(ChartKind::Devices);
        }
        if report.locations.is_some() {
            kinds.push(ChartKind::Locations);
        }
        kinds
    }

    /// Render every planned chart into `dir`, returning the written paths.
    pub fn export_report(report: &DashboardReport, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        for kind in Self::planned_charts(report) {
            let path = dir.join(kind.file_name());
            match kind {
                ChartKind::Status => {
                    Self::draw_bar_chart(&path, kind.title(), "Login Status", &report.status, true)?
                }
                ChartKind::Timeline => {
                    if let Some(timeline) = &report.timeline {
                        Self::draw_timeline(&path, timeline)?;
                    }
                }
                ChartKind::Devices => {
                    if let Some(devices) = &report.devices {
                        Self::draw_pie(&path, kind.title(), devices)?;
                    }
                }
                ChartKind::Locations => {
                    if let Some(locations) = &report.locations {
                        Self::draw_bar_chart(&path, kind.title(), "Location", locations, false)?;
                    }
                }
            }
            written.push(path);
        }

        info!(dir = %dir.display(), charts = written.len(), "Exported chart images");
        Ok(written)
    }

    fn y_upper_bound(max_count: usize) -> i32 {
        // Headroom for the value labels above the bars
        let max = max_count.max(1) as f64;
        (max * 1.15).ceil() as i32
    }

    fn draw_bar_chart(
        path: &Path,
        title: &str,
        x_desc: &str,
        breakdown: &Breakdown,
        color_by_status: bool,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let n = breakdown.entries.len().max(1) as i32;
        let max_count = breakdown.entries.iter().map(|(_, c)| *c).max().unwrap_or(0);
        let labels: Vec<&str> = breakdown.entries.iter().map(|(v, _)| v.as_str()).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 28))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0..n).into_segmented(), 0..Self::y_upper_bound(max_count))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(x_desc)
            .y_desc("Count")
            .x_label_formatter(&|seg| match seg {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels
                    .get(*i as usize)
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .draw()?;

        chart.draw_series(breakdown.entries.iter().enumerate().map(|(i, (value, count))| {
            let color = if color_by_status {
                rgb(ChartPlotter::status_color(value, i))
            } else {
                rgb(PALETTE[0])
            };
            let i = i as i32;
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0),
                    (SegmentValue::Exact(i + 1), *count as i32),
                ],
                color.filled(),
            );
            bar.set_margin(0, 0, 15, 15);
            bar
        }))?;

        chart.draw_series(breakdown.entries.iter().enumerate().map(|(i, (_, count))| {
            Text::new(
                count.to_string(),
                (SegmentValue::CenterOf(i as i32), *count as i32),
                (FONT, 16).into_font(),
            )
        }))?;

        root.present()?;
        Ok(())
    }

    fn draw_timeline(path: &Path, timeline: &TimeSeries) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let day = |date: NaiveDate| ChartPlotter::date_to_x(date) as i32;
        let first = timeline.points.first().map(|p| day(p.date)).unwrap_or(0);
        let last = timeline.points.last().map(|p| day(p.date)).unwrap_or(first);
        let max_count = timeline.points.iter().map(|p| p.count).max().unwrap_or(0);

        let mut chart = ChartBuilder::on(&root)
            .caption(ChartKind::Timeline.title(), (FONT, 28))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(first..last + 1, 0..Self::y_upper_bound(max_count))?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Count")
            .x_label_formatter(&|x| {
                ChartPlotter::x_to_date(*x as f64)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        for (i, status) in timeline.statuses().into_iter().enumerate() {
            let color = rgb(ChartPlotter::status_color(status, i));
            let points: Vec<(i32, i32)> = timeline
                .for_status(status)
                .map(|p| (day(p.date), p.count as i32))
                .collect();

            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                .label(status)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            chart.draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    fn draw_pie(path: &Path, title: &str, breakdown: &Breakdown) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled(title, (FONT, 28))?;

        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = (w.min(h) as f64) * 0.35;

        let sizes: Vec<f64> = breakdown.entries.iter().map(|(_, c)| *c as f64).collect();
        let colors: Vec<RGBColor> = (0..sizes.len())
            .map(|i| rgb(ChartPlotter::category_color(i)))
            .collect();
        let labels: Vec<String> = breakdown.entries.iter().map(|(v, _)| v.clone()).collect();

        if !sizes.is_empty() {
            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.label_style((FONT, 18).into_font());
            pie.percentages((FONT, 16).into_font().color(&WHITE));
            area.draw(&pie)?;
        }

        root.present()?;
        Ok(())
    }
}
