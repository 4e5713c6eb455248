use crate::session::Session;
use log::{error, info};
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, Result};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the QUIT FTP command.
///
/// This function sends a response indicating the service is closing the
/// control connection and marks the session so the command loop ends.
///
/// # Arguments
///
/// * `writer` - A shared, locked TCP stream for writing responses to the client.
/// * `session` - A shared, locked session containing the user's current state.
/// * `_arg` - The argument for the QUIT command (not used in this command).
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_quit_command(
    writer: Arc<Mutex<TcpStream>>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<()> {
    info!("Received QUIT command. Closing connection.");

    {
        let mut session = session.lock().await;
        session.should_close = true;
    }

    let mut writer = writer.lock().await;
    if let Err(e) = writer
        .write_all(b"221 Service closing control connection.\r\n")
        .await
    {
        error!("Failed to send QUIT response: {}", e);
        return Err(e);
    }

    Ok(())
}
