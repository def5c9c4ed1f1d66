mod app;
mod charts;
mod color;
mod config;
mod data;
mod error;
mod pipeline;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::DashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load().context("loading dashboard configuration")?;
    log::info!(
        "Scanning {} for {:?} files",
        config.data_dir.display(),
        config.extensions
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Stock Market Analysis Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
