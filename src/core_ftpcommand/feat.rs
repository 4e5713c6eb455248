use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// Handles the FEAT FTP command, advertising the optional features the
/// server implements beyond the base specification.
pub async fn handle_feat_command(
    writer: Arc<Mutex<TcpStream>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer
        .write_all(b"211-Features:\r\n SIZE\r\n MDTM\r\n211 End.\r\n")
        .await?;
    Ok(())
}
