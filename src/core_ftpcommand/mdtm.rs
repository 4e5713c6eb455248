use crate::config::Config;
use crate::core_dispatch::guard;
use crate::helpers::send_response;
use crate::session::Session;
use chrono::{DateTime, NaiveDateTime};
use filetime::{set_file_mtime, FileTime};
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::Result as TokioResult;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the MDTM FTP command.
///
/// With one argument the file's modification time is reported; with a
/// timestamp and a file name the modification time is set. Either way the
/// file path is routed through the confinement guard first.
pub async fn handle_mdtm_command(
    writer: Arc<Mutex<TcpStream>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> TokioResult<()> {
    if arg.trim().is_empty() {
        warn!("MDTM command received with no arguments");
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

    let parts: Vec<&str> = arg.split_whitespace().collect();
    if parts.len() == 1 {
        // Retrieve the modification time
        let resolved_path = match resolve_target(&writer, &root, &current_dir, parts[0]).await? {
            Some(resolved_path) => resolved_path,
            None => return Ok(()),
        };

        let metadata = match fs::metadata(&resolved_path) {
            Ok(metadata) => metadata,
            Err(e) => {
                error!(
                    "Failed to retrieve metadata for file: {:?}, error: {}",
                    resolved_path, e
                );
                send_response(&writer, b"550 File not found.\r\n").await?;
                return Ok(());
            }
        };

        let modified_time = FileTime::from_last_modification_time(&metadata);
        let modified_time = match DateTime::from_timestamp(modified_time.unix_seconds(), 0) {
            Some(modified_time) => modified_time,
            None => {
                send_response(&writer, b"550 File not found.\r\n").await?;
                return Ok(());
            }
        };
        let response = format!("213 {}\r\n", modified_time.format("%Y%m%d%H%M%S"));

        send_response(&writer, response.as_bytes()).await?;
    } else if parts.len() == 2 {
        // Set the modification time
        let datetime_str = parts[0];
        let datetime = match NaiveDateTime::parse_from_str(datetime_str, "%Y%m%d%H%M%S") {
            Ok(datetime) => datetime,
            Err(e) => {
                error!("Invalid datetime format: {}", e);
                send_response(&writer, b"501 Syntax error in parameters or arguments.\r\n")
                    .await?;
                return Ok(());
            }
        };

        let resolved_path = match resolve_target(&writer, &root, &current_dir, parts[1]).await? {
            Some(resolved_path) => resolved_path,
            None => return Ok(()),
        };

        if !resolved_path.exists() {
            error!("File not found: {:?}", resolved_path);
            send_response(&writer, b"550 File not found.\r\n").await?;
            return Ok(());
        }

        let filetime = FileTime::from_unix_time(datetime.and_utc().timestamp(), 0);
        if let Err(e) = set_file_mtime(&resolved_path, filetime) {
            error!(
                "Failed to set modification time for file: {:?}, error: {}",
                resolved_path, e
            );
            send_response(&writer, b"550 Failed to set modification time.\r\n").await?;
            return Ok(());
        }

        info!("Modification time set for {:?}", resolved_path);
        send_response(&writer, b"213 Modification time set.\r\n").await?;
    } else {
        warn!("MDTM command received with invalid arguments: {}", arg);
        send_response(&writer, b"501 Syntax error in parameters or arguments.\r\n").await?;
    }

    Ok(())
}

async fn resolve_target(
    writer: &Arc<Mutex<TcpStream>>,
    root: &Path,
    current_dir: &str,
    arg: &str,
) -> TokioResult<Option<PathBuf>> {
    let target = guard::join_virtual(current_dir, arg);
    match guard::resolve_path(root, &target) {
        Ok(resolved_path) => Ok(Some(resolved_path)),
        Err(e) => {
            error!("MDTM refused for {:?}: {}", arg, e);
            send_response(writer, e.to_ftp_response().as_bytes()).await?;
            Ok(None)
        }
    }
}
