mod app;
mod cli;
mod commands;
mod config;
mod effects;
mod render;

use anyhow::Context;
use clap::Parser;
use progress_logging::progress_info;

use crate::cli::Cli;
use crate::config::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?
        .with_token_override(cli.token);

    progress_logging::initialize(config.log.into(), config.level_filter()?, &config.log_file);
    progress_info!(
        "progress-watch starting: base_url={} client_key={} config={:?}",
        config.base_url,
        config.client_key,
        cli.config
    );

    app::run_app(config, cli.view)
}
