use crate::config::Config;
use crate::core_dispatch::guard;
use crate::helpers::send_response;
use crate::session::Session;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::fs;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the MKD (Make Directory) FTP command.
///
/// This function creates a new directory within the session root. The target
/// is routed through the confinement guard first, so a directory can only be
/// created under the session root, and sends appropriate responses back to
/// the FTP client.
///
/// # Arguments
///
/// * `writer` - A shared, locked TCP stream for writing responses to the client.
/// * `_config` - A shared server configuration (not used in this command).
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The directory name to create.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_mkd_command(
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
    let dir_path = match guard::resolve_path(&root, &target) {
        Ok(dir_path) => dir_path,
        Err(e) => {
            error!("MKD refused for {:?}: {}", arg, e);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
            return Ok(());
        }
    };

    if dir_path.exists() {
        warn!("Directory already exists: {:?}", dir_path);
        send_response(&writer, b"550 Directory already exists.\r\n").await?;
        return Ok(());
    }

    match fs::create_dir_all(&dir_path).await {
        Ok(_) => {
            info!("Directory created successfully: {:?}", dir_path);
            send_response(
                &writer,
                format!("257 \"{}\" directory created.\r\n", arg).as_bytes(),
            )
            .await?;
        }
        Err(e) => {
            error!("Failed to create directory: {:?}, error: {}", dir_path, e);
            send_response(&writer, b"550 Failed to create directory.\r\n").await?;
        }
    }

    Ok(())
}
