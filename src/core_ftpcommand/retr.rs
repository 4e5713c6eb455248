use crate::config::Config;
use crate::constants::DEFAULT_DOWNLOAD_BUFFER_SIZE;
use crate::core_dispatch::guard;
use crate::helpers::send_response;
use crate::session::Session;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the RETR (Retrieve) FTP command.
///
/// This function retrieves a file from the server and sends its contents to
/// the client over the data connection. The file path is routed through the
/// confinement guard first, so only files under the session root can ever be
/// read.
///
/// # Arguments
///
/// * `writer` - A shared, locked TCP stream for writing responses to the client.
/// * `config` - A shared server configuration.
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The name of the file to retrieve.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_retr_command(
    writer: Arc<Mutex<TcpStream>>,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if arg.trim().is_empty() {
        warn!("RETR command received with no arguments");
        send_response(&writer, b"501 Syntax error in parameters or arguments.\r\n").await?;
        return Ok(());
    }

    let (root, current_dir, data_stream) = {
        let mut session = session.lock().await;
        (
            session.bound_root.clone(),
            session.current_dir.clone(),
            session.data_stream.take(),
        )
    };

    let root = match root {
        Some(root) => root,
        None => {
            send_response(&writer, b"530 Not logged in.\r\n").await?;
            return Ok(());
        }
    };
    let data_stream = match data_stream {
        Some(data_stream) => data_stream,
        None => {
            send_response(&writer, b"425 Use PASV or PORT first.\r\n").await?;
            return Ok(());
        }
    };

    let target = guard::join_virtual(&current_dir, &arg);
    let resolved_path = match guard::resolve_path(&root, &target) {
        Ok(resolved_path) => resolved_path,
        Err(e) => {
            error!("RETR refused for {:?}: {}", arg, e);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
            return Ok(());
        }
    };

    let mut file = match File::open(&resolved_path).await {
        Ok(file) => file,
        Err(e) => {
            error!(
                "File not found or could not be opened: {:?}, error: {}",
                resolved_path, e
            );
            send_response(&writer, b"550 File not found.\r\n").await?;
            return Ok(());
        }
    };

    send_response(&writer, b"150 Opening data connection.\r\n").await?;
    info!("Sending file: {:?}", resolved_path);

    let buffer_size = config
        .server
        .download_buffer_size
        .unwrap_or(DEFAULT_DOWNLOAD_BUFFER_SIZE);
    let mut buffer = vec![0; buffer_size];
    let mut data_stream = data_stream.lock().await;

    loop {
        let bytes_read = match file.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                error!("Error reading file: {}", e);
                send_response(&writer, b"550 Error reading file.\r\n").await?;
                return Ok(());
            }
        };
        if let Err(e) = data_stream.write_all(&buffer[..bytes_read]).await {
            error!("Error sending file to client: {}", e);
            send_response(&writer, b"426 Connection closed; transfer aborted.\r\n").await?;
            return Ok(());
        }
    }

    if let Err(e) = data_stream.shutdown().await {
        error!("Error shutting down data stream: {}", e);
        send_response(&writer, b"426 Connection closed; transfer aborted.\r\n").await?;
        return Ok(());
    }

    send_response(&writer, b"226 Transfer complete.\r\n").await?;
    info!("File transfer completed successfully: {:?}", resolved_path);

    Ok(())
}
