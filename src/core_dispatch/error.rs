use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Base directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("No session directory available under {0}")]
    NoDirectoryAvailable(String),

    #[error("Path escapes the session root: {0}")]
    PathEscape(String),
}

impl DispatchError {
    pub fn to_ftp_response(&self) -> &'static str {
        match self {
            DispatchError::DirectoryUnavailable(_) => {
                "451 Requested action aborted. Local error in processing.\r\n"
            }
            DispatchError::NoDirectoryAvailable(_) => {
                "421 No session directory available, closing control connection.\r\n"
            }
            DispatchError::PathEscape(_) => "550 Path is outside of the allowed area.\r\n",
        }
    }
}
