//! Chart Viewer Widget
//! Shows the strategy chart card once its container has been revealed.

use crate::charts::ChartPlotter;
use crate::page::{Page, CHART_CONTAINER, STRATEGY_CHART};
use egui::{Color32, RichText};

const CHART_HEIGHT: f32 = 320.0;

pub struct ChartViewer;

impl ChartViewer {
    pub fn show(ui: &mut egui::Ui, page: &Page) {
        let visible = page
            .container(CHART_CONTAINER)
            .map(|c| c.is_visible())
            .unwrap_or(false);
        if !visible {
            return;
        }

        let Some(chart) = page.chart(STRATEGY_CHART).ok().and_then(|m| m.active()) else {
            return;
        };

        let border = Color32::from_rgb(75, 192, 192);
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, border))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!(
                        "Strategy Results ({} points)",
                        chart.series().len()
                    ))
                    .size(16.0)
                    .strong(),
                );
                ui.add_space(6.0);
                ChartPlotter::draw_price_chart(ui, chart, CHART_HEIGHT);
            });
    }
}
