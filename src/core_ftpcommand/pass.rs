use crate::config::Config;
use crate::core_dispatch::binder;
use crate::helpers::send_response;
use crate::session::Session;
use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the PASS FTP command.
///
/// Checks the password against the configured credential pair and, on
/// success, binds the session to the currently active directory. When no
/// directory is available the session is refused with a 421 reply and the
/// control connection is closed; the client never reaches a state where
/// filesystem commands could run without a session root.
///
/// # Arguments
///
/// * `writer` - A shared, locked TCP stream for writing responses to the client.
/// * `config` - A shared server configuration.
/// * `session` - A shared, locked session containing the user's current state.
/// * `password` - The password provided by the client.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_pass_command(
    writer: Arc<Mutex<TcpStream>>,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    password: String,
) -> Result<(), std::io::Error> {
    let username = {
        let session = session.lock().await;
        session.username.clone()
    };

    let username = match username {
        Some(username) => username,
        None => {
            send_response(&writer, b"503 Login with USER first.\r\n").await?;
            return Ok(());
        }
    };

    if username != config.server.username || password != config.server.password {
        warn!("Authentication failed for user: {}", username);
        send_response(&writer, b"530 Not logged in.\r\n").await?;
        return Ok(());
    }

    let bind_result = {
        let mut session = session.lock().await;
        match binder::bind(&mut session, Path::new(&config.server.base_dir)) {
            Ok(root) => {
                session.is_authenticated = true;
                Ok(root)
            }
            Err(e) => {
                session.should_close = true;
                Err(e)
            }
        }
    };

    match bind_result {
        Ok(root) => {
            info!("User {} logged in, session root: {:?}", username, root);
            send_response(&writer, b"230 User logged in, proceed.\r\n").await?;
        }
        Err(e) => {
            error!("Refusing session for {}: {}", username, e);
            send_response(&writer, e.to_ftp_response().as_bytes()).await?;
        }
    }

    Ok(())
}
