//! Configuration management for the Oradmin server
//!
//! Sources, lowest precedence first: the YAML file, `ORADMIN.*` environment
//! variables, command line flags.

use std::path::PathBuf;

use clap::Parser;
use config::{Config, Environment, File};

use oradmin_admin::BackupSettings;
use oradmin_persistence::DatabaseSettings;

use crate::startup::{LogRotation, LoggingConfig};

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";
pub const DEFAULT_SERVER_PORT: u16 = 7200;
pub const DEFAULT_CONTEXT_PATH: &str = "api";

/// Command line arguments for the server
#[derive(Debug, Default, Parser)]
#[command(name = "oradmin-server", version, about = "Oracle administration console")]
pub struct Cli {
    /// Configuration file (defaults to conf/application.yml when present)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    #[arg(long = "db-connect-string", env = "ORADMIN_DB_CONNECT_STRING")]
    pub db_connect_string: Option<String>,
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new() -> anyhow::Result<Self> {
        Self::load(Cli::parse())
    }

    pub fn load(args: Cli) -> anyhow::Result<Self> {
        Self::load_with(args, Self::environment())
    }

    fn environment() -> Environment {
        Environment::with_prefix("ORADMIN")
            .separator(".")
            .try_parsing(true)
    }

    fn load_with(args: Cli, environment: Environment) -> anyhow::Result<Self> {
        // an explicit --config must exist, the default file is optional
        let file = match &args.config {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut builder = Config::builder().add_source(file).add_source(environment);

        if let Some(v) = args.db_connect_string {
            builder = builder.set_override("database.connect_string", v)?;
        }
        if let Some(v) = args.port {
            builder = builder.set_override("server.port", i64::from(v))?;
        }

        Ok(Configuration {
            config: builder.build()?,
        })
    }

    // ========================================================================
    // Server
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string("server.address")
            .unwrap_or("0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int("server.port")
            .ok()
            .and_then(|port| u16::try_from(port).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    /// Scope prefix of every route, always with one leading slash
    pub fn server_context_path(&self) -> String {
        let path = self
            .config
            .get_string("server.context_path")
            .unwrap_or(DEFAULT_CONTEXT_PATH.to_string());
        format!("/{}", path.trim_matches('/'))
    }

    pub fn server_workers(&self) -> usize {
        self.config
            .get_int("server.workers")
            .ok()
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
    }

    // ========================================================================
    // Database
    // ========================================================================

    pub fn database_settings(&self) -> DatabaseSettings {
        DatabaseSettings::new(
            self.config
                .get_string("database.username")
                .unwrap_or("SYSTEM".to_string()),
            self.config
                .get_string("database.password")
                .unwrap_or_default(),
            self.config
                .get_string("database.connect_string")
                .unwrap_or("localhost:1521/XE".to_string()),
        )
    }

    // ========================================================================
    // Backup
    // ========================================================================

    pub fn backup_settings(&self) -> BackupSettings {
        let defaults = BackupSettings::default();
        let text = |key: &str, fallback: String| self.config.get_string(key).unwrap_or(fallback);

        BackupSettings {
            directory: self
                .config
                .get_string("backup.directory")
                .map(PathBuf::from)
                .unwrap_or(defaults.directory),
            directory_alias: text("backup.directory_alias", defaults.directory_alias),
            export_command: text("backup.export_command", defaults.export_command),
            import_command: text("backup.import_command", defaults.import_command),
            service_name: text("backup.service_name", defaults.service_name),
            full_dump_name: text("backup.full_dump_name", defaults.full_dump_name),
        }
    }

    // ========================================================================
    // Logging
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.config.get_string("logging.dir").ok(),
            self.config.get_bool("logging.console").unwrap_or(true),
            self.config.get_bool("logging.file").unwrap_or(true),
            &self
                .config
                .get_string("logging.level")
                .unwrap_or("info".to_string()),
            LogRotation::parse(
                &self
                    .config
                    .get_string("logging.rotation")
                    .unwrap_or("daily".to_string()),
            ),
        )
    }
}
