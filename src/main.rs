mod config;
mod constants;
mod core_cli;
mod core_dispatch;
mod core_ftpcommand;
mod core_network;
mod helpers;
mod server;
mod session;

use crate::config::Config;
use crate::core_cli::Cli;
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    // Write an example configuration file and exit when requested
    if let Some(path) = &args.create_config {
        config::write_example_config(path)
            .with_context(|| format!("Failed to create example configuration file: {}", path))?;
        return Ok(());
    }

    // Load configuration from the TOML file, or start from the defaults
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    // Command-line arguments override config file settings
    args.apply_overrides(&mut config);

    // Run the FTP server
    server::run(config).await?;

    Ok(())
}
