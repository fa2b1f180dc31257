mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::DashboardApp;
use config::DashboardConfig;
use state::AppState;

/// Flat earth tweets dashboard.
#[derive(Parser, Debug)]
#[command(name = "fe-dashboard", about = "Explore flat earth tweets from 2010 to 2022")]
struct Cli {
    /// Path to a TOML config file (default: $FE_DASHBOARD_CONFIG, if set).
    #[arg(long)]
    config: Option<PathBuf>,

    /// URL or path of the per-tweet CSV.
    #[arg(long)]
    tweets: Option<String>,

    /// URL or path of the per-day CSV.
    #[arg(long)]
    daily: Option<String>,

    /// Debug run mode: verbose logging and the egui hover inspector.
    #[arg(long)]
    debug: bool,

    /// Write both chart specifications for the default selection as JSON
    /// and exit without opening a window.
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    ExitCode::from(exit_status(run(cli)))
}

/// Log a failed run once and map it to the process exit status.
fn exit_status(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            log::error!("{e:#}");
            1
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = DashboardConfig::resolve(cli.config.as_deref())?;
    if let Some(tweets) = cli.tweets {
        config.tweets_source = tweets;
    }
    if let Some(daily) = cli.daily {
        config.daily_source = daily;
    }

    let dataset = data::loader::load_dataset(&config.sources())
        .context("loading dataset at startup")?;
    let state = AppState::new(Arc::new(dataset), &config);

    if let Some(path) = cli.export {
        let json = serde_json::to_string_pretty(&state.charts.to_json())?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing chart export to {}", path.display()))?;
        log::info!("Wrote chart specifications to {}", path.display());
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let debug = cli.debug;
    eframe::run_native(
        "Flat Earth Tweets",
        options,
        Box::new(move |cc| {
            if debug {
                cc.egui_ctx.style_mut(|style| style.debug.debug_on_hover = true);
            }
            Ok(Box::new(DashboardApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running window: {e}"))
}
