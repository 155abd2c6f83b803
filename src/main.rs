// Hide console window in release builds (Windows GUI app)
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod app_data;
mod backend;
mod cli;
mod config;
mod demo;
mod dialog;
mod download;
mod media;
mod panel;
mod site_status;
mod state;
mod task;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::backend::Services;
use crate::cli::{Cli, CliContext};
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "weddingpix_admin=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();

    if let Some(command) = args.command {
        let context = CliContext {
            format: args.output.format(),
            quiet: args.output.quiet,
            demo: args.demo,
        };
        return cli::run(command, context).await;
    }

    tracing::info!("Starting WeddingPix Admin");

    let config = Config::load()?;
    let services = Services::from_config(&config.backend, args.demo)?;
    tracing::info!("Backend: {}", services.label);

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([980.0, 760.0])
        .with_min_inner_size([640.0, 520.0])
        .with_title("WeddingPix Admin");

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true, // Save/restore window size and position
        ..Default::default()
    };

    eframe::run_native(
        "WeddingPix Admin",
        native_options,
        Box::new(move |cc| match app::AdminApp::new(cc, config, services) {
            Ok(app) => Ok(Box::new(app)),
            Err(e) => Err(e.into()),
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
