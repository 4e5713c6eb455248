// src/constants.rs

pub const USERNAME_REGEX: &str = r"^[a-zA-Z0-9]{1,32}$";

pub const SERVER_GREETING: &str = "220 FTP dispatch server ready.\r\n";

pub const DEFAULT_UPLOAD_BUFFER_SIZE: usize = 256 * 1024;
pub const DEFAULT_DOWNLOAD_BUFFER_SIZE: usize = 128 * 1024;
