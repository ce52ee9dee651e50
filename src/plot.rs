use anyhow::{anyhow, Result};
use eframe::egui::{self, Color32, Ui};
use egui_plot::{Corner, GridMark, Legend, Line, Plot, PlotPoints, Points};
use log::info;

use crate::chart::{TrendChart, X_AXIS_LABEL, Y_AXIS_LABEL};
use crate::cluster::ClusterTrends;
use crate::color::Rgb;

const CHART_HEIGHT: f32 = 320.0;

/// Open a window with one line chart per cluster. Blocks until the window
/// is closed.
pub fn cluster_trend_plot(trends: &ClusterTrends, label: &str) -> Result<()> {
    let charts: Vec<TrendChart> = trends
        .iter()
        .map(|(name, table)| TrendChart::from_table(label, name, table))
        .collect();
    info!("Plotting {} clusters", charts.len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        &format!("{} trends", label),
        options,
        Box::new(move |_cc| Ok(Box::new(TrendPlotApp { charts }))),
    )
    .map_err(|e| anyhow!("Failed to show trend plots: {}", e))
}

struct TrendPlotApp {
    charts: Vec<TrendChart>,
}

impl eframe::App for TrendPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (idx, chart) in self.charts.iter().enumerate() {
                    trend_chart(ui, idx, chart);
                    ui.add_space(16.0);
                }
            });
        });
    }
}

fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Render a single cluster chart.
fn trend_chart(ui: &mut Ui, idx: usize, chart: &TrendChart) {
    ui.horizontal(|ui| {
        ui.heading(&chart.title);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(&chart.legend_title);
        });
    });

    let years = chart.years.clone();
    let tick_chart = chart.clone();

    Plot::new(("trend_plot", idx))
        .height(CHART_HEIGHT)
        .legend(Legend::default().position(Corner::RightTop))
        .x_axis_label(X_AXIS_LABEL)
        .y_axis_label(Y_AXIS_LABEL)
        .show_grid(false)
        .x_grid_spacer(move |_input| {
            years
                .iter()
                .map(|year| GridMark {
                    value: f64::from(*year),
                    step_size: 1.0,
                })
                .collect()
        })
        .x_axis_formatter(move |mark, _range| {
            if tick_chart.is_year_tick(mark.value) {
                format!("{}", mark.value as i32)
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let points: PlotPoints = series.points.iter().copied().collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&series.word)
                        .color(color(series.color))
                        .width(2.0),
                );
                let markers: PlotPoints = series.points.iter().copied().collect();
                plot_ui.points(
                    Points::new(markers)
                        .name(&series.word)
                        .color(color(series.color))
                        .radius(3.0),
                );
            }
        });
}
