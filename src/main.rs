use anyhow::Context;
use eframe::egui;

use penguin_dash::app::PenguinDashApp;
use penguin_dash::config::DashboardConfig;
use penguin_dash::data;
use penguin_dash::data::model::PenguinDataset;
use penguin_dash::state::AppState;

/// Load the dataset once at startup: the configured file, else the bundled one.
fn load_dataset(config: &DashboardConfig) -> anyhow::Result<PenguinDataset> {
    match &config.data_path {
        Some(path) => {
            let dataset = data::loader::load_file(path)
                .with_context(|| format!("loading dataset {}", path.display()))?;
            log::info!("Loaded {} penguins from {}", dataset.len(), path.display());
            Ok(dataset)
        }
        None => {
            let dataset = data::sample::bundled_dataset();
            log::info!("Using bundled dataset ({} penguins)", dataset.len());
            Ok(dataset)
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load().context("loading configuration")?;
    let dataset = load_dataset(&config)?;
    let state = AppState::new(dataset, &config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        &config.title,
        options,
        Box::new(|_cc| Ok(Box::new(PenguinDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
