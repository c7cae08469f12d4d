mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod views;

use anyhow::{anyhow, Context, Result};
use app::FoodImpactApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load().context("loading dashboard config")?;
    let window_size = config.window_size;
    let data_path = config.data_path.clone();

    // A failed initial load leaves the error in the top bar; the user can
    // still open another file.
    let mut state = AppState::new(config);
    if let Err(e) = state.load_path(&data_path) {
        log::warn!("Starting without data: {e:#}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(window_size)
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "🌱 Food Production Impact Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(FoodImpactApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard: {e}"))
}
