//! Market Dashboard - crypto/stock tables, strategy results and price charts
//!
//! A Rust application that fetches market and strategy data from a trading
//! backend and renders it into tables and a time-keyed price chart.

mod actions;
mod charts;
mod config;
mod data;
mod gui;
mod page;
mod table;

use anyhow::Context;
use config::Settings;
use data::ApiClient;
use eframe::egui;
use gui::MarketDashApp;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load()?;
    log::info!(
        "app.start base_url={} timeout_secs={} sample_chart={}",
        settings.base_url,
        settings.timeout_secs,
        settings.sample_chart
    );

    let client = ApiClient::http(&settings.base_url, settings.timeout())
        .context("building HTTP client")?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.width, settings.height])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("Market Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Market Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(MarketDashApp::new(cc, settings, client)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
