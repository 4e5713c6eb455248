use crate::config::Config;
use crate::core_dispatch::guard;
use crate::helpers::send_response;
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the CWD (Change Working Directory) FTP command.
///
/// The target is checked by the confinement guard before the session's
/// working directory changes; a target above the session root is refused
/// and the working directory stays where it was.
///
/// # Arguments
///
/// * `writer` - A shared, locked TCP stream for writing responses to the client.
/// * `_config` - A shared server configuration (not used in this command).
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The directory to change into.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_cwd_command(
    writer: Arc<Mutex<TcpStream>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    let root = match session.bound_root.clone() {
        Some(root) => root,
        None => {
            drop(session);
            send_response(&writer, b"530 Not logged in.\r\n").await?;
            return Ok(());
        }
    };

    let target = guard::join_virtual(&session.current_dir, &arg);
    let normalized = match guard::normalize_relative(&target) {
        Ok(normalized) => normalized,
        Err(e) => {
            warn!("CWD refused for {:?}: {}", arg, e);
            drop(session);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
            return Ok(());
        }
    };

    match guard::resolve_path(&root, &normalized) {
        Ok(path) if path.is_dir() => {
            session.current_dir = normalized;
            info!("Directory successfully changed to: {}", session.virtual_cwd());
            drop(session);
            send_response(&writer, b"250 Directory successfully changed.\r\n").await?;
        }
        Ok(_) => {
            drop(session);
            send_response(&writer, b"550 Failed to change directory.\r\n").await?;
        }
        Err(e) => {
            warn!("CWD refused for {:?}: {}", arg, e);
            drop(session);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
        }
    }

    Ok(())
}
