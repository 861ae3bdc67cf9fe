use std::{fs::OpenOptions, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use dockertable::{
    app::App,
    config::{Cli, Config},
    docker::get_running_containers,
};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config)?;

    info!("Fetching running containers from docker");
    let fetched = get_running_containers().await;

    info!("Starting terminal UI");
    App::new(fetched, config.columns).run()?;

    info!("Terminal UI closed");
    Ok(())
}

/// Log to the configured file. Without one nothing is logged, since stdout and stderr belong to
/// the terminal UI.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = config.log_file.as_deref() else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(config.log_level()?)
        .init();
    Ok(())
}
