mod app;
mod controller;
mod data;
mod error;
mod render;
mod state;
mod ui;

use std::path::PathBuf;

use app::JustPlotApp;
use clap::Parser;
use eframe::egui;
use eframe::egui_wgpu;
use state::settings::Settings;
use tracing_subscriber::EnvFilter;

/// Plot every column of a text table against its first column.
#[derive(Parser, Debug)]
#[command(name = "justplot", version, about)]
struct Args {
    /// Data files to load at startup
    files: Vec<PathBuf>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG overrides the default level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,justplot=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = Settings::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("JustPlot")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true),
        wgpu_options: egui_wgpu::WgpuConfiguration {
            present_mode: eframe::wgpu::PresentMode::AutoVsync,
            ..Default::default()
        },
        ..Default::default()
    };

    eframe::run_native(
        "JustPlot",
        options,
        Box::new(move |cc| Ok(Box::new(JustPlotApp::new(cc, settings, args.files)))),
    )
}
