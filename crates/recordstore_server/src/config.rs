//! Server and storage configuration from CLI flags and environment.
//!
//! Every flag falls back to a `RECORDSTORE_*` environment variable and then to
//! the built-in default.

use clap::Parser;
use recordstore_core::config::{
    DEFAULT_ARCHIVE_DIR, DEFAULT_DB_FILE, DEFAULT_LOG_FILE, DEFAULT_WORKSPACE_DIR,
};
use recordstore_core::StorageConfig;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Command-line arguments of the `recordstore` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "recordstore", version, about = "Record store HTTP service")]
pub struct Args {
    /// SQLite database file
    #[arg(long, env = "RECORDSTORE_DB_PATH", default_value = DEFAULT_DB_FILE)]
    pub db_path: PathBuf,

    /// Append-only activity log written by `log_message`
    #[arg(long, env = "RECORDSTORE_LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Directory receiving `upload-core` entries
    #[arg(long, env = "RECORDSTORE_ARCHIVE_DIR", default_value = DEFAULT_ARCHIVE_DIR)]
    pub archive_dir: PathBuf,

    /// Root that `update_file` filenames resolve against
    #[arg(long, env = "RECORDSTORE_WORKSPACE_DIR", default_value = DEFAULT_WORKSPACE_DIR)]
    pub workspace_dir: PathBuf,

    #[arg(long, env = "RECORDSTORE_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    #[arg(long, env = "RECORDSTORE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Diagnostic log level: trace|debug|info|warn|error
    #[arg(long, env = "RECORDSTORE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rotating diagnostic logs
    #[arg(long, env = "RECORDSTORE_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

impl Args {
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            db_path: self.db_path.clone(),
            log_file: self.log_file.clone(),
            archive_dir: self.archive_dir.clone(),
            workspace_dir: self.workspace_dir.clone(),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }

    /// Diagnostic log directory made absolute against `cwd`.
    pub fn absolute_log_dir(&self, cwd: &Path) -> PathBuf {
        if self.log_dir.is_absolute() {
            self.log_dir.clone()
        } else {
            cwd.join(&self.log_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Args, ServerConfig};
    use clap::Parser;
    use recordstore_core::StorageConfig;
    use std::path::Path;

    #[test]
    fn default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr(), "127.0.0.1:8000");
        assert_eq!(ServerConfig::with_port(9090).socket_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn no_flags_yield_default_layout() {
        let args = Args::try_parse_from(["recordstore"]).unwrap();
        assert_eq!(args.storage_config(), StorageConfig::default());
        assert_eq!(args.server_config(), ServerConfig::default());
        assert_eq!(args.log_level, None);
    }

    #[test]
    fn flags_override_storage_paths() {
        let args = Args::try_parse_from([
            "recordstore",
            "--db-path",
            "/data/records.db",
            "--archive-dir",
            "/data/archive",
            "--port",
            "9001",
        ])
        .unwrap();

        let storage = args.storage_config();
        assert_eq!(storage.db_path, Path::new("/data/records.db"));
        assert_eq!(storage.archive_dir, Path::new("/data/archive"));
        assert_eq!(args.server_config().port, 9001);
    }

    #[test]
    fn relative_log_dir_is_resolved_against_cwd() {
        let args = Args::try_parse_from(["recordstore", "--log-dir", "diag"]).unwrap();
        assert_eq!(
            args.absolute_log_dir(Path::new("/srv/app")),
            Path::new("/srv/app/diag")
        );
    }
}
