mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::FiringViewerApp;
use eframe::egui;
use firing_viewer::AnalysisConfig;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AnalysisConfig::discover().unwrap_or_else(|e| {
        log::warn!("Ignoring configuration, using defaults: {e:#}");
        AnalysisConfig::default()
    });
    log::debug!("Channel roles: {:?}", config.roles);

    let mut state = AppState::new(config);
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.load(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Firing Viewer – Channel Selector",
        options,
        Box::new(|_cc| Ok(Box::new(FiringViewerApp::new(state)))),
    )
}
