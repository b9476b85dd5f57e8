//! Configuration management for the `kubedeck` binary
//!
//! Values come from an optional YAML file layered under `KUBEDECK__*`
//! environment variables (`KUBEDECK__LOGS__LEVEL=debug` sets `logs.level`).
//! The cluster store location is fixed and not read from here.

use config::{Config, ConfigError, Environment, File};

use kubedeck_persistence::StoreOptions;

use crate::logging::{LogRotation, LoggingConfig};

/// Config file read when `--config` is not given; missing is fine
pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";

const ENV_PREFIX: &str = "KUBEDECK";

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration; an explicitly named file must exist
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(Self::from_config(config))
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn log_dir(&self) -> Option<String> {
        self.config.get_string("logs.path").ok()
    }

    pub fn log_level(&self) -> String {
        self.config
            .get_string("logs.level")
            .unwrap_or("warn".to_string())
    }

    pub fn log_console(&self) -> bool {
        self.config.get_bool("logs.console").unwrap_or(true)
    }

    pub fn log_file(&self) -> bool {
        self.config.get_bool("logs.file").unwrap_or(false)
    }

    pub fn log_rotation(&self) -> LogRotation {
        self.config
            .get_string("logs.rotation")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(LogRotation::Daily)
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.log_dir(),
            self.log_console(),
            self.log_file(),
            &self.log_level(),
            self.log_rotation(),
        )
    }

    // ========================================================================
    // Store Configuration
    // ========================================================================

    pub fn store_options(&self) -> StoreOptions {
        let defaults = StoreOptions::default();
        StoreOptions {
            max_connections: self
                .config
                .get_int("db.max_connections")
                .ok()
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.max_connections),
            sqlx_logging: self
                .config
                .get_bool("db.sqlx_logging")
                .unwrap_or(defaults.sqlx_logging),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use tracing::Level;

    fn from_yaml(yaml: &str) -> Configuration {
        let config = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap();
        Configuration::from_config(config)
    }

    #[test]
    fn test_defaults_when_empty() {
        let configuration = Configuration::default();
        assert_eq!(configuration.log_dir(), None);
        assert_eq!(configuration.log_level(), "warn");
        assert!(configuration.log_console());
        assert!(!configuration.log_file());
        assert_eq!(configuration.log_rotation(), LogRotation::Daily);

        let options = configuration.store_options();
        assert_eq!(options.max_connections, 4);
        assert!(!options.sqlx_logging);
    }

    #[test]
    fn test_values_from_yaml() {
        let configuration = from_yaml(
            r#"
logs:
  path: /var/log/kubedeck
  level: debug
  console: false
  file: true
  rotation: hourly
db:
  max_connections: 8
  sqlx_logging: true
"#,
        );

        let logging = configuration.logging_config();
        assert_eq!(logging.log_dir.to_str(), Some("/var/log/kubedeck"));
        assert!(!logging.console_output);
        assert!(logging.file_logging);
        assert_eq!(logging.console_level, Level::DEBUG);
        assert_eq!(logging.rotation, LogRotation::Hourly);

        let options = configuration.store_options();
        assert_eq!(options.max_connections, 8);
        assert!(options.sqlx_logging);
    }

    #[test]
    fn test_invalid_pool_size_uses_default() {
        let configuration = from_yaml("db:\n  max_connections: 0\n");
        assert_eq!(configuration.store_options().max_connections, 4);

        let configuration = from_yaml("db:\n  max_connections: -3\n");
        assert_eq!(configuration.store_options().max_connections, 4);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Configuration::load(Some("/nonexistent/kubedeck.yml")).is_err());
    }
}
