// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Timber Pros photo annotator
//!
//! A desktop application for marking up job-site photos with colored
//! circles and lines (trees to cut, trees to keep, paths to clear) and
//! short notes.

mod app;
mod config;
mod engine;
mod io;
mod models;
mod ui;
mod util;

use std::path::PathBuf;

use anyhow::Result;
use app::TimberApp;
use config::Config;
use models::photo::PhotoCollection;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref());

    let photos = match &config.photo_set {
        Some(path) => crate::io::serialization::import_photo_set(path).unwrap_or_else(|e| {
            log::error!("{:#}; falling back to demo photos", e);
            PhotoCollection::demo()
        }),
        None => PhotoCollection::demo(),
    };

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Timber Pros - Photo Annotator"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Timber Pros",
        options,
        Box::new(move |_cc| Ok(Box::new(TimberApp::new(photos, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
