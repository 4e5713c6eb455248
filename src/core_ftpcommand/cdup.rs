use crate::config::Config;
use crate::core_dispatch::guard;
use crate::helpers::send_response;
use crate::session::Session;
use log::{info, warn};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the CDUP (Change to Parent Directory) FTP command.
///
/// Moving up from the session root is refused like any other escape; the
/// client's apparent root never moves.
pub async fn handle_cdup_command(
    writer: Arc<Mutex<TcpStream>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    if session.bound_root.is_none() {
        drop(session);
        send_response(&writer, b"530 Not logged in.\r\n").await?;
        return Ok(());
    }

    let target = guard::join_virtual(&session.current_dir, "..");
    match guard::normalize_relative(&target) {
        Ok(normalized) => {
            session.current_dir = normalized;
            info!("Directory successfully changed to: {}", session.virtual_cwd());
            drop(session);
            send_response(&writer, b"250 Directory successfully changed.\r\n").await?;
        }
        Err(e) => {
            warn!("CDUP refused at {:?}: {}", session.virtual_cwd(), e);
            drop(session);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
        }
    }

    Ok(())
}
