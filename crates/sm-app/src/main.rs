//! Stakeholder map dashboard

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use sm_data::{DashboardConfig, RecordSource, StakeholderCsvSource};
use sm_ui::{apply_theme, Theme};
use tracing::info;

mod app;
mod cli;
mod logging;

use crate::app::StakeholderApp;
use crate::cli::Cli;
use crate::logging::{init_logging, LogConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format.into()))
        .context("failed to initialize logging")?;

    let config = dashboard_config(&cli)?;
    info!(
        data = %config.data_path.display(),
        cache = %config.cache_path.display(),
        "starting stakeholder map"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let source = StakeholderCsvSource::from_config(&config);
    let store = runtime
        .block_on(source.load())
        .with_context(|| format!("failed to load {}", source.source_name()))?;
    drop(runtime);

    let title = config.title.clone();
    let app = StakeholderApp::new(store, config).context("failed to build the initial view")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 600.0]),
        default_theme: eframe::Theme::Light,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            apply_theme(&cc.egui_ctx, &Theme::default());
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow!("failed to run dashboard: {}", e))?;

    Ok(())
}

/// Config file (or defaults) with the CLI path overrides applied
fn dashboard_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load_or_default(cli.config.as_deref())?;
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    if let Some(cache) = &cli.cache {
        config.cache_path = cache.clone();
    }
    Ok(config)
}
