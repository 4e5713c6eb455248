// src/core_ftpcommand/pwd.rs
use crate::config::Config;
use crate::session::Session;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the PWD FTP command.
///
/// Reports the working directory as the client sees it, rooted at the
/// session root. The real location on disk is never revealed.
pub async fn handle_pwd_command(
    writer: Arc<Mutex<TcpStream>>,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> std::io::Result<()> {
    let current_dir = {
        let session = session.lock().await;
        session.virtual_cwd()
    };
    let response = format!("257 \"{}\" is the current directory.\r\n", current_dir);

    let mut writer = writer.lock().await;
    writer.write_all(response.as_bytes()).await?;
    Ok(())
}
