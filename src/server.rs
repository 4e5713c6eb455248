use crate::config::Config;
use crate::core_dispatch::resolver;
use crate::core_network::network;
use crate::helpers::log_config;
use anyhow::{bail, Result};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Runs the FTP server with the provided configuration.
///
/// The base directory is validated before the listener starts accepting
/// connections; a missing or non-directory base aborts startup. Per-session
/// resolution failures later on only refuse the session that hit them.
///
/// # Arguments
///
/// * `config` - The server configuration.
///
/// # Returns
///
/// Result<(), anyhow::Error> indicating the success or failure of the operation.
pub async fn run(config: Config) -> Result<()> {
    if config.server.base_dir.is_empty() {
        bail!("No base directory configured (use --base-dir or the config file)");
    }

    let base_dir = Path::new(&config.server.base_dir);
    match std::fs::metadata(base_dir) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => bail!("Base path is not a directory: {}", config.server.base_dir),
        Err(e) => bail!(
            "Base directory does not exist: {}: {}",
            config.server.base_dir,
            e
        ),
    }

    info!("Starting FTP server with configuration:");
    log_config(&config);

    match resolver::resolve(base_dir) {
        Ok(Some(active)) => info!("Active session directory: {:?}", active.path),
        Ok(None) => warn!(
            "Base directory has no subdirectories yet; sessions will be refused until one appears"
        ),
        Err(e) => warn!("Initial scan failed: {}", e),
    }

    let config = Arc::new(config);

    if let Some(interval_secs) = config.server.rescan_interval_secs.filter(|secs| *secs > 0) {
        start_rescan_watcher(Arc::clone(&config), interval_secs);
    }

    // Start the FTP server
    match network::start_server(Arc::clone(&config)).await {
        Ok(_) => info!("Server stopped."),
        Err(e) => {
            error!("Failed to start server: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

/// Periodically re-resolves the active directory and reports changes.
///
/// Observational only. Sessions bound earlier keep their root; the watcher
/// exists so operators can see where newly connecting sessions will land.
fn start_rescan_watcher(config: Arc<Config>, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        let mut last_active: Option<PathBuf> = None;

        loop {
            interval.tick().await;
            match resolver::resolve(Path::new(&config.server.base_dir)) {
                Ok(Some(active)) => {
                    if last_active.as_ref() != Some(&active.path) {
                        info!("Active session directory is now {:?}", active.path);
                        last_active = Some(active.path);
                    }
                }
                Ok(None) => {
                    if last_active.take().is_some() {
                        warn!("Base directory has no subdirectories; new sessions will be refused");
                    }
                }
                Err(e) => warn!("Re-scan of the base directory failed: {}", e),
            }
        }
    });
}
