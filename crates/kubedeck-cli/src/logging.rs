//! Logging setup for the `kubedeck` binary.
//!
//! Console output goes to stderr so command output on stdout stays machine
//! readable. File logging is optional and writes daily-rotated files:
//!
//! | Log File          | Component                 | Target Prefixes        |
//! |-------------------|---------------------------|------------------------|
//! | kubedeck.log      | Root logger (all events)  | (all)                  |
//! | persistence.log   | Cluster store             | kubedeck_persistence   |
//!
//! Log files are stored in `~/kubedeck/logs` unless `logs.path` is set.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const ROOT_LOG_FILE: &str = "kubedeck.log";

/// Events from the store and repository also go to their own file
const PERSISTENCE_LOG_FILE: &str = "persistence.log";
const PERSISTENCE_TARGET: &str = "kubedeck_persistence";

/// Log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
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

impl std::str::FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(LogRotation::Daily),
            "hourly" => Ok(LogRotation::Hourly),
            "never" => Ok(LogRotation::Never),
            _ => Err(format!("Invalid log rotation: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub console_level: Level,
    pub file_logging: bool,
    pub file_level: Level,
    pub rotation: LogRotation,
}

fn default_log_dir() -> PathBuf {
    kubedeck_common::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("kubedeck")
        .join("logs")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console_output: true,
            console_level: Level::WARN,
            file_logging: false,
            file_level: Level::INFO,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    /// Create from application configuration values
    pub fn from_config(
        log_dir: Option<String>,
        console_output: bool,
        file_logging: bool,
        level: &str,
        rotation: LogRotation,
    ) -> Self {
        let level = level.parse().unwrap_or(Level::INFO);
        Self {
            log_dir: log_dir.map(PathBuf::from).unwrap_or_else(default_log_dir),
            console_output,
            console_level: level,
            file_logging,
            file_level: level,
            rotation,
        }
    }
}

/// Keeps the non-blocking file writers alive; flushes them when dropped
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

fn rolling_writer(config: &LoggingConfig, file_name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(config.rotation.into(), &config.log_dir, file_name);
    tracing_appender::non_blocking(appender)
}

fn file_layer(writer: NonBlocking) -> impl Layer<Registry> + Send + Sync + 'static {
    fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` overrides the configured level for the console and root file
/// layers. `persistence.log` captures everything from the persistence crate.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
    }

    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.console_output {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.console_level.to_string()));
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(filter);
        layers.push(Box::new(console_layer));
    }

    if config.file_logging {
        let root_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.file_level.to_string()));
        let (root_writer, root_guard) = rolling_writer(config, ROOT_LOG_FILE);
        guards.push(root_guard);
        layers.push(Box::new(file_layer(root_writer).with_filter(root_filter)));

        let persistence_filter = Targets::new().with_target(PERSISTENCE_TARGET, LevelFilter::TRACE);
        let (persistence_writer, persistence_guard) = rolling_writer(config, PERSISTENCE_LOG_FILE);
        guards.push(persistence_guard);
        layers.push(Box::new(file_layer(persistence_writer).with_filter(persistence_filter)));
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::debug!(log_dir = %config.log_dir.display(), "File logging initialized");
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}
