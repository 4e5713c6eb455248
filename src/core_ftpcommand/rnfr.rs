use crate::config::Config;
use crate::core_dispatch::guard;
use crate::helpers::send_response;
use crate::session::Session;
use log::error;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the RNFR (Rename From) FTP command.
///
/// This function records the file or directory to be renamed. The source is
/// routed through the confinement guard, so only content under the session
/// root can be picked up for a rename.
///
/// # Arguments
///
/// * `writer` - A shared, locked TCP stream for writing responses to the client.
/// * `_config` - A shared server configuration (not used in this command).
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The current name of the file or directory.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_rnfr_command(
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
            error!("RNFR refused for {:?}: {}", arg, e);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
            return Ok(());
        }
    };

    if !resolved_path.exists() {
        send_response(&writer, b"550 File or directory does not exist.\r\n").await?;
        return Ok(());
    }

    // Store the path in the session for use by the RNTO command.
    {
        let mut session = session.lock().await;
        session.rename_from = Some(resolved_path);
    }

    send_response(&writer, b"350 Ready for RNTO.\r\n").await?;

    Ok(())
}
