use clap::Parser;

use crate::config::Config;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "ftpdispatch",
    about = "An FTP server that dispatches every session into the most recently created subdirectory of a base directory."
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Write an example configuration file to PATH and exit
    #[arg(long, value_name = "PATH")]
    pub create_config: Option<String>,

    /// Base directory scanned for session directories
    #[arg(short, long)]
    pub base_dir: Option<String>,

    /// Address the control channel listens on
    #[arg(long)]
    pub listen_address: Option<String>,

    /// Port the control channel listens on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// FTP username
    #[arg(short, long)]
    pub user: Option<String>,

    /// FTP password
    #[arg(long)]
    pub password: Option<String>,

    /// Seconds between active-directory re-scans (0 disables the watcher)
    #[arg(long)]
    pub rescan_interval: Option<u64>,
}

impl Cli {
    /// Command-line values take precedence over configuration file values.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(base_dir) = &self.base_dir {
            config.server.base_dir = base_dir.clone();
        }
        if let Some(listen_address) = &self.listen_address {
            config.server.listen_address = listen_address.clone();
        }
        if let Some(port) = self.port {
            config.server.listen_port = port;
        }
        if let Some(user) = &self.user {
            config.server.username = user.clone();
        }
        if let Some(password) = &self.password {
            config.server.password = password.clone();
        }
        if let Some(rescan_interval) = self.rescan_interval {
            config.server.rescan_interval_secs = Some(rescan_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_values_override_config() {
        let mut config = Config::default();
        config.server.base_dir = String::from("/config/base");
        config.server.listen_port = 9999;
        config.server.username = String::from("configuser");

        let cli = Cli::parse_from([
            "ftpdispatch",
            "--base-dir",
            "/args/base",
            "--port",
            "8888",
            "--password",
            "argspass",
        ]);
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.base_dir, "/args/base"); // command line wins
        assert_eq!(config.server.listen_port, 8888); // command line wins
        assert_eq!(config.server.username, "configuser"); // config value kept
        assert_eq!(config.server.password, "argspass");
    }

    #[test]
    fn absent_flags_leave_config_untouched() {
        let mut config = Config::default();
        config.server.base_dir = String::from("/config/base");

        let cli = Cli::parse_from(["ftpdispatch"]);
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.base_dir, "/config/base");
        assert_eq!(config.server.listen_port, 2121);
    }
}
