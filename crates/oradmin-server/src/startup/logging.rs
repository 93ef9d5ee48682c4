//! Multi-file logging
//!
//! Every event reaches the console and the root `oradmin.log`. Component files
//! additionally collect the events of one layer of the console, routed by
//! tracing target:
//!
//! | Log File          | Component                          | Target Prefixes                                |
//! |-------------------|------------------------------------|------------------------------------------------|
//! | oradmin.log       | Root logger (all components)       | (all)                                          |
//! | audit.log         | Audit queries and configuration    | oradmin_audit                                  |
//! | admin.log         | Security, tablespaces, backups     | oradmin_admin                                  |
//! | persistence.log   | Database gateway                   | oradmin_persistence                            |
//! | http.log          | HTTP handlers and middleware       | oradmin_server::api, oradmin_server::middleware |
//!
//! Component files honor `logging.level` but not `RUST_LOG`. Log files are
//! stored in `~/oradmin/logs` unless `logging.dir` says otherwise.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::{Filter, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const ROOT_LOG_FILE: &str = "oradmin.log";

struct ComponentLogDef {
    file_name: &'static str,
    targets: &'static [&'static str],
}

const COMPONENT_LOGS: &[ComponentLogDef] = &[
    ComponentLogDef {
        file_name: "audit.log",
        targets: &["oradmin_audit"],
    },
    ComponentLogDef {
        file_name: "admin.log",
        targets: &["oradmin_admin"],
    },
    ComponentLogDef {
        file_name: "persistence.log",
        targets: &["oradmin_persistence"],
    },
    ComponentLogDef {
        file_name: "http.log",
        targets: &["oradmin_server::api", "oradmin_server::middleware"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
}

impl LogRotation {
    /// Unknown names fall back to daily rotation
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "hourly" => LogRotation::Hourly,
            "never" => LogRotation::Never,
            _ => LogRotation::Daily,
        }
    }
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub file_logging: bool,
    pub level: Level,
    pub rotation: LogRotation,
}

fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join("oradmin").join("logs")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console_output: true,
            file_logging: true,
            level: Level::INFO,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    pub fn from_config(
        log_dir: Option<String>,
        console_output: bool,
        file_logging: bool,
        level: &str,
        rotation: LogRotation,
    ) -> Self {
        Self {
            log_dir: log_dir.map(PathBuf::from).unwrap_or_else(default_log_dir),
            console_output,
            file_logging,
            level: level.parse().unwrap_or(Level::INFO),
            rotation,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
    }

    fn component_filter(&self, component: &ComponentLogDef) -> Targets {
        let level = LevelFilter::from_level(self.level);
        component
            .targets
            .iter()
            .fold(Targets::new(), |targets, target| targets.with_target(*target, level))
    }
}

/// Keeps the non-blocking file writers alive; dropping it flushes them.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn file_layer<F>(
    config: &LoggingConfig,
    file_name: &str,
    filter: F,
    guards: &mut Vec<WorkerGuard>,
) -> BoxedLayer
where
    F: Filter<Registry> + Send + Sync + 'static,
{
    let appender = RollingFileAppender::new(config.rotation.into(), &config.log_dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    guards.push(guard);

    Box::new(
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_names(true)
            .with_ansi(false)
            .with_filter(filter),
    )
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the configured level for the console and the root
/// file only.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
    }

    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.console_output {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_filter(config.env_filter());
        layers.push(Box::new(console_layer));
    }

    if config.file_logging {
        layers.push(file_layer(config, ROOT_LOG_FILE, config.env_filter(), &mut guards));

        for component in COMPONENT_LOGS {
            let filter = config.component_filter(component);
            layers.push(file_layer(config, component.file_name, filter, &mut guards));
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::info!(
            log_dir = %config.log_dir.display(),
            component_files = COMPONENT_LOGS.len(),
            "File logging initialized"
        );
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}
