use crate::config::Config;
use crate::core_dispatch::guard;
use crate::helpers::send_response;
use crate::session::Session;
use chrono::{DateTime, Local};
use log::{error, info};
use std::fs::Metadata;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the LIST FTP command.
///
/// Sends a unix-style listing of the guarded target over the data
/// connection. Without an argument the current working directory is listed;
/// with one, the named directory or file. The listing can only ever show
/// content under the session root.
///
/// # Arguments
///
/// * `writer` - A shared, locked TCP stream for writing responses to the client.
/// * `_config` - A shared server configuration (not used in this command).
/// * `session` - A shared, locked session containing the user's current state.
/// * `arg` - The directory or file to list, possibly empty.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_list_command(
    writer: Arc<Mutex<TcpStream>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
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
    let dir_path = match guard::resolve_path(&root, &target) {
        Ok(dir_path) => dir_path,
        Err(e) => {
            error!("LIST refused for {:?}: {}", arg, e);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
            return Ok(());
        }
    };

    let mut listing = String::new();
    if dir_path.is_dir() {
        let entries = match std::fs::read_dir(&dir_path) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to read directory {:?}: {}", dir_path, e);
                send_response(&writer, b"550 Failed to list directory.\r\n").await?;
                return Ok(());
            }
        };
        for entry in entries.flatten() {
            if let Ok(metadata) = entry.metadata() {
                listing.push_str(&format_list_entry(
                    &metadata,
                    &entry.file_name().to_string_lossy(),
                ));
            }
        }
    } else {
        match std::fs::metadata(&dir_path) {
            Ok(metadata) => {
                let name = dir_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                listing.push_str(&format_list_entry(&metadata, &name));
            }
            Err(_) => {
                send_response(&writer, b"550 File or directory not found.\r\n").await?;
                return Ok(());
            }
        }
    }

    send_response(
        &writer,
        b"150 Opening ASCII mode data connection for file list.\r\n",
    )
    .await?;

    {
        let mut data_stream = data_stream.lock().await;
        data_stream.write_all(listing.as_bytes()).await?;
        data_stream.shutdown().await?;
    }

    send_response(&writer, b"226 Transfer complete.\r\n").await?;
    info!("Directory listing sent for {:?}", dir_path);

    Ok(())
}

fn format_list_entry(metadata: &Metadata, name: &str) -> String {
    let (kind, mode) = if metadata.is_dir() {
        ('d', "rwxr-xr-x")
    } else {
        ('-', "rw-r--r--")
    };
    let modified: DateTime<Local> = metadata
        .modified()
        .map(DateTime::from)
        .unwrap_or_else(|_| Local::now());

    format!(
        "{}{} 1 owner group {:>12} {} {}\r\n",
        kind,
        mode,
        metadata.len(),
        modified.format("%b %e %H:%M"),
        name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_and_files_are_marked() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("file.txt"), "content").unwrap();

        let dir_meta = std::fs::metadata(dir.path().join("sub")).unwrap();
        let file_meta = std::fs::metadata(dir.path().join("file.txt")).unwrap();

        let dir_line = format_list_entry(&dir_meta, "sub");
        let file_line = format_list_entry(&file_meta, "file.txt");

        assert!(dir_line.starts_with("drwxr-xr-x"));
        assert!(dir_line.ends_with("sub\r\n"));
        assert!(file_line.starts_with("-rw-r--r--"));
        assert!(file_line.contains(" 7 "));
        assert!(file_line.ends_with("file.txt\r\n"));
    }
}
