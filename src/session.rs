use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct Session {
    /// Working directory relative to the session root. Empty at the root.
    pub current_dir: String,
    pub rename_from: Option<PathBuf>,
    pub data_stream: Option<Arc<Mutex<TcpStream>>>,
    pub type_: String,            // The primary transfer type (A, E, I, L)
    pub byte_size: Option<u8>,    // The byte size for TYPE L (None if not applicable)
    /// Directory this session is confined to. None until the binder runs
    /// after authentication; never reassigned afterwards.
    pub bound_root: Option<PathBuf>,
    pub username: Option<String>, // Username for the session
    pub is_authenticated: bool,   // Indicates if the user is authenticated
    /// Set when the control connection should end after the current reply
    /// (QUIT, or a refused session bind).
    pub should_close: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            current_dir: String::new(),
            rename_from: None,
            data_stream: None,
            type_: "A".to_string(), // Default transfer type is ASCII
            byte_size: None,        // Default byte size is None
            bound_root: None,
            username: None,
            is_authenticated: false,
            should_close: false,
        }
    }

    /// Working directory as the client sees it, rooted at "/".
    pub fn virtual_cwd(&self) -> String {
        if self.current_dir.is_empty() {
            String::from("/")
        } else {
            format!("/{}", self.current_dir)
        }
    }
}
