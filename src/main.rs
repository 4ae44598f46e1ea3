mod app;
mod charts;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use app::ListingLensApp;
use clap::Parser;
use eframe::egui;

use charts::build_dashboard;
use config::Config;
use data::filter::FilterSelection;
use state::AppState;

fn main() -> ExitCode {
    let config = Config::parse();
    config::init_logger(config.verbose);

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<()> {
    // A dataset that cannot be loaded aborts startup.
    let dataset = Arc::new(data::loader::load_file(&config.data)?);
    if dataset.is_empty() {
        log::warn!("{} contains no listings", config.data.display());
    }
    let options = config.chart_options();

    if let Some(dir) = &config.export {
        let dashboard = build_dashboard(&dataset, &FilterSelection::all(&dataset), &options);
        dashboard.export_to_dir(dir)?;
        println!("{}", dashboard.price_label);
        return Ok(());
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 480.0]),
        ..Default::default()
    };

    let state = AppState::new(dataset, options);
    eframe::run_native(
        "Listing Lens – Rental Analytics",
        native_options,
        Box::new(|_cc| Ok(Box::new(ListingLensApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the dashboard window")
}
