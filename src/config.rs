use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DOWNLOAD_BUFFER_SIZE, DEFAULT_UPLOAD_BUFFER_SIZE};

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    pub pasv_address: String,
    /// Directory whose most recently created subdirectory becomes the root
    /// of every new session.
    pub base_dir: String,
    pub username: String,
    pub password: String,
    /// Seconds between active-directory re-scans reported in the log.
    /// 0 or absent disables the watcher; new sessions always re-resolve.
    pub rescan_interval_secs: Option<u64>,
    pub upload_buffer_size: Option<usize>, // Optional to allow default value
    pub download_buffer_size: Option<usize>, // Optional to allow default value
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from("127.0.0.1"),
            listen_port: 2121,
            pasv_address: String::from("127.0.0.1"),
            base_dir: String::new(),
            username: String::from("anonymous"),
            password: String::from("pass"),
            rescan_interval_secs: None,
            upload_buffer_size: Some(DEFAULT_UPLOAD_BUFFER_SIZE),
            download_buffer_size: Some(DEFAULT_DOWNLOAD_BUFFER_SIZE),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))?;

        // Set defaults if not specified
        if config.server.upload_buffer_size.is_none() {
            config.server.upload_buffer_size = Some(DEFAULT_UPLOAD_BUFFER_SIZE);
        }
        if config.server.download_buffer_size.is_none() {
            config.server.download_buffer_size = Some(DEFAULT_DOWNLOAD_BUFFER_SIZE);
        }

        Ok(config)
    }
}

/// Writes an example configuration file the operator can edit.
pub fn write_example_config(path: &str) -> Result<()> {
    let mut example = Config::default();
    example.server.base_dir = String::from("/path/to/your/base/directory");

    let rendered = toml::to_string_pretty(&example)
        .context("Failed to serialize the example configuration")?;
    std::fs::write(path, rendered)
        .with_context(|| format!("Failed to write example configuration file: {}", path))?;

    info!("Example config file created at: {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = Config::default();
        assert_eq!(config.server.listen_address, "127.0.0.1");
        assert_eq!(config.server.listen_port, 2121);
        assert_eq!(config.server.username, "anonymous");
        assert_eq!(config.server.password, "pass");
        assert!(config.server.base_dir.is_empty());
        assert_eq!(config.server.rescan_interval_secs, None);
    }

    #[test]
    fn full_config_file_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
listen_address = "192.168.1.100"
listen_port = 2122
pasv_address = "192.168.1.100"
base_dir = "/test/base/dir"
username = "testuser"
password = "testpass"
rescan_interval_secs = 30
"#
        )
        .unwrap();

        let config = Config::load_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.listen_address, "192.168.1.100");
        assert_eq!(config.server.listen_port, 2122);
        assert_eq!(config.server.base_dir, "/test/base/dir");
        assert_eq!(config.server.username, "testuser");
        assert_eq!(config.server.password, "testpass");
        assert_eq!(config.server.rescan_interval_secs, Some(30));
        // unspecified buffer sizes fall back to the defaults
        assert_eq!(
            config.server.upload_buffer_size,
            Some(DEFAULT_UPLOAD_BUFFER_SIZE)
        );
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
base_dir = "/test/base/dir"
"#
        )
        .unwrap();

        let config = Config::load_from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.base_dir, "/test/base/dir");
        assert_eq!(config.server.listen_port, 2121);
        assert_eq!(config.server.username, "anonymous");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(Config::load_from_file("/nonexistent/ftpdispatch.conf").is_err());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{ invalid toml content").unwrap();
        assert!(Config::load_from_file(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn example_config_is_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.conf");
        write_example_config(path.to_str().unwrap()).unwrap();

        let config = Config::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.base_dir, "/path/to/your/base/directory");
        assert_eq!(config.server.listen_port, 2121);
    }
}
