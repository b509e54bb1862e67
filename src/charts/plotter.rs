//! Chart Plotter Module
//! Draws the live price chart interactively using egui_plot.

use crate::charts::{format_day, ChartInstance, Rgba};
use egui::Color32;
use egui_plot::{uniform_grid_spacer, Legend, Line, Plot, PlotPoints};

pub fn to_color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

/// Draws chart instances into an egui `Ui`.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw the price line with a day-granularity time axis.
    pub fn draw_price_chart(ui: &mut egui::Ui, chart: &ChartInstance, height: f32) {
        let style = chart.style();
        let day_step = style.x_unit_days;
        let points: PlotPoints = chart.series().xy().into();

        Plot::new(format!("price_chart_{}", chart.generation()))
            .height(height)
            .legend(Legend::default())
            .x_axis_label("Date")
            .y_axis_label(style.label)
            .allow_scroll(false)
            .x_grid_spacer(uniform_grid_spacer(move |_input| {
                [day_step, day_step * 7.0, day_step * 28.0]
            }))
            .x_axis_formatter(|mark, _range| format_day(mark.value))
            .y_axis_formatter(|mark, _range| format!("{:.2}", mark.value))
            .label_formatter(|name, value| {
                if name.is_empty() {
                    format_day(value.x)
                } else {
                    format!("{}\n{}: {:.2}", format_day(value.x), name, value.y)
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(points)
                        .color(to_color32(style.color))
                        .width(style.line_width)
                        .name(style.label),
                );
            });
    }
}
