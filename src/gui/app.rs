//! Market Dashboard Main Application
//! Main window with control panel, market/strategy tables and the price chart.

use crate::actions::{Action, Dispatcher};
use crate::charts::{render_chart, sample_series, StaticChartRenderer};
use crate::config::Settings;
use crate::data::ApiClient;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, TableView};
use crate::page::{
    Page, CHART_CONTAINER, CRYPTO_TABLE, MARKET_STATUS, RL_AGENT_TABLE, STOCK_TABLE,
    STRATEGY_CHART, STRATEGY_RESULTS, STRATEGY_TABLE,
};
use anyhow::Context;
use egui::{RichText, SidePanel};
use std::path::Path;
use std::time::Duration;

/// Tables in display order: (section title, table id, card title).
const TABLES: [(&str, &str, &str); 4] = [
    ("Markets", CRYPTO_TABLE, "Top Cryptocurrencies"),
    ("Markets", STOCK_TABLE, "Stocks"),
    ("RL Agent", RL_AGENT_TABLE, "RL Agent Results"),
    ("Strategies", STRATEGY_TABLE, "Strategy Signals"),
];

/// Main application window.
pub struct MarketDashApp {
    settings: Settings,
    page: Page,
    dispatcher: Dispatcher,
    control_panel: ControlPanel,
}

impl MarketDashApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings, client: ApiClient) -> Self {
        let mut page = Page::dashboard();
        log::debug!("page.layout elements={:?}", page.describe());
        if settings.sample_chart {
            if let Err(e) = render_chart(&mut page, STRATEGY_CHART, CHART_CONTAINER, sample_series())
            {
                log::error!("chart.sample error={}", e);
            }
        }

        Self {
            control_panel: ControlPanel::new(client.base_url()),
            dispatcher: Dispatcher::new(client),
            settings,
            page,
        }
    }

    fn handle_action(&mut self, action: Action) {
        self.dispatcher.dispatch(action);
    }

    /// Save the live chart as PNG and open it with the system viewer.
    fn handle_export_chart(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("strategy_chart.png")
            .save_file()
        else {
            return; // User cancelled
        };

        let outcome = self.export_chart(&path);
        if let Ok(status) = self.page.status_mut(STRATEGY_RESULTS) {
            match &outcome {
                Ok(()) => status.info(format!("Chart exported to {}", path.display())),
                Err(e) => status.error(format!("Export failed: {:#}", e)),
            }
        }

        if outcome.is_ok() {
            if let Err(e) = open::that(&path) {
                log::warn!("chart.open path={} error={}", path.display(), e);
            }
        }
    }

    fn export_chart(&self, path: &Path) -> anyhow::Result<()> {
        let chart = self
            .page
            .chart(STRATEGY_CHART)?
            .active()
            .context("no chart to export")?;
        StaticChartRenderer::render_to_file(
            chart,
            path,
            self.settings.export_width,
            self.settings.export_height,
        )
        .with_context(|| format!("rendering {}", path.display()))?;
        Ok(())
    }

    fn show_tables(&self, ui: &mut egui::Ui, section: &str) {
        for (_, id, title) in TABLES.iter().filter(|(s, _, _)| *s == section) {
            if let Ok(table) = self.page.table(id) {
                TableView::show(ui, id, title, table);
                ui.add_space(12.0);
            }
        }
    }

    fn show_status(&self, ui: &mut egui::Ui, id: &str) {
        if let Ok(status) = self.page.status(id) {
            TableView::show_status(ui, status);
        }
    }
}

impl eframe::App for MarketDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply finished fetches in the order they completed
        self.dispatcher.drain(&mut self.page);

        self.control_panel.in_flight = self.dispatcher.in_flight();
        self.control_panel.export_enabled = self
            .page
            .chart(STRATEGY_CHART)
            .map(|c| c.active().is_some())
            .unwrap_or(false);

        if self.dispatcher.in_flight() > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::Run(action) => self.handle_action(action),
                        ControlPanelAction::ExportChart => self.handle_export_chart(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading(RichText::new("Markets").strong());
                    self.show_status(ui, MARKET_STATUS);
                    ui.add_space(6.0);
                    self.show_tables(ui, "Markets");

                    ui.separator();
                    ui.heading(RichText::new("RL Agent").strong());
                    ui.add_space(6.0);
                    self.show_tables(ui, "RL Agent");

                    ui.separator();
                    ui.heading(RichText::new("Strategies").strong());
                    self.show_status(ui, STRATEGY_RESULTS);
                    ui.add_space(6.0);
                    self.show_tables(ui, "Strategies");
                    ChartViewer::show(ui, &self.page);
                });
        });
    }
}
