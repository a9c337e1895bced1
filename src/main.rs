//! JCPAO Received Cases Dashboard
//!
//! Loads the monthly cases-by-agency CSV once, then filters and charts it
//! interactively.

mod charts;
mod config;
mod data;
mod gui;
mod logger;

use anyhow::Context;
use config::{DashboardConfig, CONFIG_FILE};
use data::{CaseLoader, CaseTable, Reshaper};
use eframe::egui;
use gui::DashboardApp;
use std::sync::Arc;
use tracing::{error, info};

/// Read and reshape the dataset. This is the only place it is built.
fn load_dataset(config: &DashboardConfig) -> anyhow::Result<Arc<CaseTable>> {
    let wide = CaseLoader::load_csv(&config.data_path).with_context(|| {
        format!(
            "Failed to load case data from {}",
            config.data_path.display()
        )
    })?;
    let table = Reshaper::to_long(&wide);
    info!(rows = table.len(), "Case table ready");
    Ok(Arc::new(table))
}

fn main() -> eframe::Result<()> {
    let (config, config_error) = match DashboardConfig::load_or_default(CONFIG_FILE) {
        Ok(config) => (config, None),
        Err(e) => (DashboardConfig::default(), Some(e)),
    };

    if let Err(e) = logger::init(&config.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let dataset = match config_error {
        Some(e) => Err(anyhow::Error::new(e)),
        None => load_dataset(&config),
    };
    if let Err(e) = &dataset {
        error!("{:#}", e);
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1000.0, 650.0])
            .with_title(&config.title),
        ..Default::default()
    };

    let app_name = config.title.clone();
    eframe::run_native(
        &app_name,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, dataset)))),
    )
}
