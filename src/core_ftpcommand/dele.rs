use crate::config::Config;
use crate::core_dispatch::guard;
use crate::helpers::send_response;
use crate::session::Session;
use log::{error, info};
use std::sync::Arc;
use tokio::fs;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the DELE (Delete File) FTP command.
///
/// This function deletes a file within the session root. The path is routed
/// through the confinement guard before anything is touched, and sends
/// appropriate responses back to the FTP client.
///
/// # Arguments
///
/// * `writer` - A shared, locked TCP stream for writing responses to the client.
/// * `_config` - A shared server configuration (not used in this command).
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The file name to delete.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_dele_command(
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
            error!("DELE refused for {:?}: {}", arg, e);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
            return Ok(());
        }
    };

    if !resolved_path.is_file() {
        send_response(&writer, b"550 File does not exist.\r\n").await?;
        return Ok(());
    }

    match fs::remove_file(&resolved_path).await {
        Ok(_) => {
            info!("File deleted: {:?}", resolved_path);
            send_response(
                &writer,
                format!("250 \"{}\" file deleted.\r\n", arg).as_bytes(),
            )
            .await?;
        }
        Err(e) => {
            error!("Failed to delete file: {:?}, error: {}", resolved_path, e);
            send_response(&writer, b"550 Failed to delete file.\r\n").await?;
        }
    }

    Ok(())
}
