use crate::config::Config;
use crate::constants::SERVER_GREETING;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::initialize_command_handlers;
use crate::session::Session;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

pub async fn start_server(config: Arc<Config>) -> Result<()> {
    let listener = TcpListener::bind(format!(
        "{}:{}",
        config.server.listen_address, config.server.listen_port
    ))
    .await?;
    info!(
        "Server listening on {}:{}",
        config.server.listen_address, config.server.listen_port
    );

    loop {
        let (socket, addr) = listener.accept().await?;
        info!("New connection from {:?}", addr);

        let config = Arc::clone(&config);
        // The session starts with no root; the binder assigns one after
        // authentication succeeds.
        let session = Arc::new(Mutex::new(Session::new()));

        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, config, session).await {
                error!("Connection error: {:?}", e);
            }
            info!("Connection closed for {:?}", addr);
        });
    }
}

pub async fn handle_connection(
    socket: TcpStream,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
) -> Result<()> {
    let socket = Arc::new(Mutex::new(socket));
    {
        let mut socket = socket.lock().await;
        socket.write_all(SERVER_GREETING.as_bytes()).await?;
    }

    let handlers = initialize_command_handlers();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        {
            let mut locked_socket = socket.lock().await;
            let mut reader = BufReader::new(&mut *locked_socket);
            let n = reader.read_line(&mut buffer).await?;
            drop(locked_socket);

            if n == 0 {
                info!("Client disconnected");
                break;
            }
        }

        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }
        info!("Received command: {}", line);

        // The argument is everything after the verb, so file names with
        // spaces survive.
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or_default();
        let arg = parts.next().unwrap_or_default().trim().to_string();

        let command = match FtpCommand::from_str(cmd) {
            Some(command) => command,
            None => {
                let mut socket = socket.lock().await;
                socket
                    .write_all(b"502 Command not implemented.\r\n")
                    .await?;
                continue;
            }
        };

        if command.requires_auth() && !session.lock().await.is_authenticated {
            let mut socket = socket.lock().await;
            socket.write_all(b"530 Not logged in.\r\n").await?;
            continue;
        }

        if let Some(handler) = handlers.get(&command) {
            if let Err(e) = handler(
                Arc::clone(&socket),
                Arc::clone(&config),
                Arc::clone(&session),
                arg,
            )
            .await
            {
                error!("Error handling command {:?}: {:?}", command, e);
                break;
            }
        }

        if session.lock().await.should_close {
            break;
        }
    }
    Ok(())
}
