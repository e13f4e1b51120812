use anyhow::Context;
use clap::Parser;

use notify_rs::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli).context("failed to load configuration")?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(
        application = %settings.application.name,
        version = %settings.application.version,
        "configuration loaded"
    );

    execute_command(&cli, settings).await?;
    Ok(())
}
