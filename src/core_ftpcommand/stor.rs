use crate::config::Config;
use crate::constants::DEFAULT_UPLOAD_BUFFER_SIZE;
use crate::core_dispatch::guard;
use crate::helpers::send_response;
use crate::session::Session;
use log::{error, info, warn};
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::{
    fs::File,
    io::{self, AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    sync::Mutex,
};

/// Handles the STOR (Store File) FTP command.
///
/// This function stores a file uploaded by the client within the session
/// root. The target path is routed through the confinement guard before the
/// file is created, so an upload can never land outside the session root,
/// symlinks included.
///
/// # Arguments
///
/// * `writer` - A shared, locked TCP stream for writing responses to the client.
/// * `config` - A shared server configuration.
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The name of the file to be stored.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_stor_command(
    writer: Arc<Mutex<TcpStream>>,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> io::Result<()> {
    if arg.trim().is_empty() {
        warn!("STOR command received with no arguments");
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

    // 1. Secure path construction
    let target = guard::join_virtual(&current_dir, &arg);
    let file_path = match guard::resolve_path(&root, &target) {
        Ok(file_path) => file_path,
        Err(e) => {
            error!("STOR refused for {:?}: {}", arg, e);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
            return Ok(());
        }
    };
    if file_path.is_dir() {
        send_response(&writer, b"550 Target is a directory.\r\n").await?;
        return Ok(());
    }

    // 2. Create the file and handle errors
    let mut file = match File::create(&file_path).await {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create file: {:?}, error: {}", file_path, e);
            let message: &[u8] = match e.kind() {
                ErrorKind::NotFound => b"550 File not found.\r\n",
                ErrorKind::PermissionDenied => b"550 Permission denied.\r\n",
                _ => b"451 Requested action aborted. Local error in processing.\r\n",
            };
            send_response(&writer, message).await?;
            return Ok(());
        }
    };

    // 3. Data transfer
    send_response(
        &writer,
        b"150 File status okay; about to open data connection.\r\n",
    )
    .await?;

    let mut data_stream = data_stream.lock().await;
    let buffer_size = config
        .server
        .upload_buffer_size
        .unwrap_or(DEFAULT_UPLOAD_BUFFER_SIZE);
    let mut buffer = vec![0; buffer_size];

    loop {
        let bytes_read = match data_stream.read(&mut buffer).await {
            Ok(0) => break, // End of transfer
            Ok(n) => n,
            Err(e) => {
                error!("Error reading from data stream: {}", e);
                send_response(&writer, b"550 File read error.\r\n").await?;
                return Ok(());
            }
        };

        if let Err(e) = file.write_all(&buffer[..bytes_read]).await {
            error!("Error writing to file: {}", e);
            return Err(e);
        }
    }

    // Shut down data stream when done
    if let Err(e) = data_stream.shutdown().await {
        error!("Error shutting down data stream: {}", e);
        send_response(&writer, b"426 Connection closed; transfer aborted.\r\n").await?;
        return Ok(());
    }

    send_response(&writer, b"226 File transfer complete.\r\n").await?;
    info!("File stored successfully: {:?}", file_path);

    Ok(())
}
