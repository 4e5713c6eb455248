use crate::config::Config;
use crate::core_dispatch::guard;
use crate::helpers::send_response;
use crate::session::Session;
use log::{error, info};
use std::sync::Arc;
use tokio::fs;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the RNTO (Rename To) FTP command.
///
/// This function renames the file or directory recorded by RNFR. Both ends
/// of the rename are confined: the source was guarded by RNFR, and the
/// destination is routed through the guard here, so a rename can never move
/// content out of the session root.
///
/// # Arguments
///
/// * `writer` - A shared, locked TCP stream for writing responses to the client.
/// * `_config` - A shared server configuration (not used in this command).
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The new name of the file or directory.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_rnto_command(
    writer: Arc<Mutex<TcpStream>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if arg.trim().is_empty() {
        send_response(&writer, b"501 Syntax error in parameters or arguments.\r\n").await?;
        return Ok(());
    }

    let (root, current_dir, old_path) = {
        let mut session = session.lock().await;
        (
            session.bound_root.clone(),
            session.current_dir.clone(),
            session.rename_from.take(),
        )
    };
    let root = match root {
        Some(root) => root,
        None => {
            send_response(&writer, b"530 Not logged in.\r\n").await?;
            return Ok(());
        }
    };
    let old_path = match old_path {
        Some(old_path) => old_path,
        None => {
            send_response(&writer, b"503 Bad sequence of commands.\r\n").await?;
            return Ok(());
        }
    };

    let target = guard::join_virtual(&current_dir, &arg);
    let new_path = match guard::resolve_path(&root, &target) {
        Ok(new_path) => new_path,
        Err(e) => {
            error!("RNTO refused for {:?}: {}", arg, e);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
            return Ok(());
        }
    };

    match fs::rename(&old_path, &new_path).await {
        Ok(_) => {
            info!("Renamed {:?} to {:?}", old_path, new_path);
            send_response(&writer, b"250 File or directory renamed successfully.\r\n").await?;
        }
        Err(e) => {
            error!(
                "Failed to rename {:?} to {:?}: {}",
                old_path, new_path, e
            );
            send_response(&writer, b"550 Failed to rename file or directory.\r\n").await?;
        }
    }

    Ok(())
}
