mod app;
mod config;
mod transfers;
mod util;

use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Args, Config};
use crate::transfers::HttpTransferSource;

fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wallet_network=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_args(Args::parse())?;
    info!(
        api = %config.api_base_url,
        timeout = ?config.request_timeout,
        live_physics = config.live_physics,
        "starting wallet network viewer"
    );

    let source = HttpTransferSource::new(config.api_base_url.clone(), config.request_timeout)
        .context("failed to build HTTP client")?;
    let source = Arc::new(source);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wallet Network",
        options,
        Box::new(move |cc| Ok(Box::new(app::WalletNetworkApp::new(cc, source, &config)))),
    )
    .map_err(|error| anyhow!("failed to open window: {error}"))
}
