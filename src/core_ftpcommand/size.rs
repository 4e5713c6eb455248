// core_ftpcommand/size.rs

use crate::config::Config;
use crate::core_dispatch::guard;
use crate::helpers::send_response;
use crate::session::Session;
use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the SIZE (File Size) FTP command.
///
/// This function retrieves the size of a file under the session root and
/// sends the size information back to the client. The path is routed
/// through the confinement guard first.
///
/// # Arguments
///
/// * `writer` - A shared, locked TCP stream for writing responses to the client.
/// * `_config` - A shared server configuration (not used in this command).
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The name of the file to retrieve its size.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_size_command(
    writer: Arc<Mutex<TcpStream>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if arg.trim().is_empty() {
        send_response(&writer, b"501 Syntax error in parameters or arguments.\r\n").await?;
        return Ok(());
    }

    let (root, current_dir) = {
        let session = session.lock().await;
        (session.bound_root.clone(), session.current_dir.clone())
    };
    let root = match root {
        Some(root) => root,
        None => {
            send_response(&writer, b"530 Not logged in.\r\n").await?;
            return Ok(());
        }
    };

    let target = guard::join_virtual(&current_dir, &arg);
    let resolved_path = match guard::resolve_path(&root, &target) {
        Ok(resolved_path) => resolved_path,
        Err(e) => {
            error!("SIZE refused for {:?}: {}", arg, e);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
            return Ok(());
        }
    };

    // Get file metadata
    let metadata = match tokio::fs::metadata(&resolved_path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            error!(
                "Failed to get file metadata: {:?}, error: {}",
                resolved_path, e
            );
            send_response(
                &writer,
                b"550 Requested action not taken (file unavailable or not accessible).\r\n",
            )
            .await?;
            return Ok(());
        }
    };

    if !metadata.is_file() {
        send_response(&writer, b"550 Requested action not taken (not a file).\r\n").await?;
        return Ok(());
    }

    // Send size response
    let file_size = metadata.len();
    info!("File size for {:?} is {}", resolved_path, file_size);
    send_response(&writer, format!("213 {}\r\n", file_size).as_bytes()).await?;

    Ok(())
}
