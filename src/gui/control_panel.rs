//! Control Panel Widget
//! Left side panel with one button per backend action.

use crate::actions::Action;
use egui::{Color32, RichText};

/// Button groups, in display order.
const SECTIONS: [(&str, &[Action]); 3] = [
    ("📈 Markets", &[Action::FetchCryptos, Action::FetchStocks]),
    ("🤖 RL Agent", &[Action::TrainRlAgent, Action::EvaluateRlAgent]),
    (
        "🧭 Strategies",
        &[
            Action::RunTrendFollower,
            Action::RunMeanReversion,
            Action::ShowStrategyResults,
        ],
    ),
];

/// Left side control panel.
pub struct ControlPanel {
    pub backend: String,
    pub in_flight: usize,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(backend: &str) -> Self {
        Self {
            backend: backend.to_string(),
            in_flight: 0,
            export_enabled: false,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Market Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new(&self.backend).size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();

        for (title, actions) in SECTIONS {
            ui.add_space(8.0);
            ui.label(RichText::new(title).size(14.0).strong());
            ui.add_space(5.0);

            for &a in actions {
                let button = egui::Button::new(RichText::new(a.label()).size(14.0))
                    .min_size(egui::vec2(220.0, 28.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Run(a);
                }
            }

            ui.add_space(8.0);
            ui.separator();
        }

        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Chart").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportChart;
                }
            });
        });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            if self.in_flight > 0 {
                ui.spinner();
                ui.label(
                    RichText::new(format!("{} request(s) in flight", self.in_flight)).size(11.0),
                );
            } else {
                ui.label(RichText::new("Idle").size(11.0).color(Color32::GRAY));
            }
        });

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Run(Action),
    ExportChart,
}
