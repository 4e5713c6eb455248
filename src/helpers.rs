use crate::config::Config;
use log::info;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Sends a response to the client.
pub async fn send_response(
    writer: &Arc<Mutex<TcpStream>>,
    message: &[u8],
) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer.write_all(message).await?;
    Ok(())
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!(
        "  Listen Address: {}:{}",
        config.server.listen_address, config.server.listen_port
    );
    info!("  PASV Address: {}", config.server.pasv_address);
    info!("  Base Directory: {}", config.server.base_dir);
    info!("  Username: {}", config.server.username);
    match config.server.rescan_interval_secs {
        Some(secs) if secs > 0 => info!("  Re-scan Interval: {} s", secs),
        _ => info!("  Re-scan Interval: disabled"),
    }
    info!(
        "  Upload Buffer Size: {} KB",
        config
            .server
            .upload_buffer_size
            .unwrap_or(crate::constants::DEFAULT_UPLOAD_BUFFER_SIZE)
            / 1024
    );
    info!(
        "  Download Buffer Size: {} KB",
        config
            .server
            .download_buffer_size
            .unwrap_or(crate::constants::DEFAULT_DOWNLOAD_BUFFER_SIZE)
            / 1024
    );
}
