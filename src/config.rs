//! Logger configuration
//!
//! A [`LoggerConfig`] can be built in code or read from a TOML file; keys that
//! are missing from the file take their default value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::level::LogLevel;
use crate::sink::SinkConfig;

/// Base name used when none is configured
pub const DEFAULT_BASE_NAME: &str = "rotalog";

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "ROTALOG_CONFIG";

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Directory holding the numbered log files; must already exist
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,

    /// File name prefix, files are named `{base_name}.{n}.log`
    #[serde(default = "default_base_name")]
    pub base_name: String,

    /// Least severe level still emitted (default: most verbose)
    #[serde(default = "default_verbosity")]
    pub verbosity: LogLevel,

    /// Maximum number of log files kept, 0 for unlimited
    #[serde(default)]
    pub max_files: usize,

    /// Also write to standard output
    #[serde(default = "default_console")]
    pub console: bool,
}

fn default_log_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|e| {
        tracing::warn!("Could not determine current directory ({}), using '.'", e);
        PathBuf::from(".")
    })
}

fn default_base_name() -> String {
    DEFAULT_BASE_NAME.to_string()
}

fn default_verbosity() -> LogLevel {
    LogLevel::MOST_VERBOSE
}

fn default_console() -> bool {
    true
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_directory: default_log_directory(),
            base_name: default_base_name(),
            verbosity: default_verbosity(),
            max_files: 0,
            console: default_console(),
        }
    }
}

impl LoggerConfig {
    /// Configuration writing to `log_directory`, other settings default
    pub fn new(log_directory: impl Into<PathBuf>) -> Self {
        Self {
            log_directory: log_directory.into(),
            ..Self::default()
        }
    }

    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    pub fn with_verbosity(mut self, verbosity: LogLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from file, or return default if not found
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Sinks described by this configuration, in dispatch order
    pub fn sinks(&self) -> Vec<SinkConfig> {
        let mut sinks = Vec::with_capacity(2);
        if self.console {
            sinks.push(SinkConfig::Console);
        }
        sinks.push(SinkConfig::RotatingFile {
            directory: self.log_directory.clone(),
            base_name: self.base_name.clone(),
            max_files: self.max_files,
        });
        sinks
    }
}

/// Get the default config file path (`<config dir>/rotalog/config.toml`)
///
/// Returns `None` if the platform has no config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rotalog").join("config.toml"))
}

/// Config file chosen by `$ROTALOG_CONFIG`, falling back to [`default_config_path`]
pub fn config_file_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => default_config_path(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();
        assert_eq!(config.base_name, "rotalog");
        assert_eq!(config.verbosity, LogLevel::NotSet);
        assert_eq!(config.max_files, 0);
        assert!(config.console);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = LoggerConfig::from_toml_str(
            r#"
            base_name = "server"
            verbosity = "warn"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_name, "server");
        assert_eq!(config.verbosity, LogLevel::Warn);
        assert_eq!(config.max_files, 0);
        assert!(config.console);
        assert_eq!(config.log_directory, default_log_directory());
    }

    #[test]
    fn test_full_toml() {
        let config = LoggerConfig::from_toml_str(
            r#"
            log_directory = "/var/log/app"
            base_name = "app"
            verbosity = "CRIT"
            max_files = 5
            console = false
            "#,
        )
        .unwrap();

        assert_eq!(config.log_directory, PathBuf::from("/var/log/app"));
        assert_eq!(config.verbosity, LogLevel::Critical);
        assert_eq!(config.max_files, 5);
        assert!(!config.console);
    }

    #[test]
    fn test_invalid_level_in_toml() {
        let err = LoggerConfig::from_toml_str(r#"verbosity = "loud""#).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("loud")));
    }

    #[test]
    fn test_config_serialization() {
        let config = LoggerConfig::new("/tmp/logs")
            .with_base_name("svc")
            .with_verbosity(LogLevel::Notice)
            .with_max_files(4);

        let toml_str = toml::to_string(&config).unwrap();
        let parsed = LoggerConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoggerConfig::load(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, LoggerConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "max_files = 2\n").unwrap();

        let config = LoggerConfig::load(&path).unwrap();
        assert_eq!(config.max_files, 2);
    }

    #[test]
    fn test_sinks_console_first() {
        let sinks = LoggerConfig::new("/tmp").sinks();
        assert_eq!(sinks.len(), 2);
        assert_eq!(sinks[0], SinkConfig::Console);
        assert!(matches!(sinks[1], SinkConfig::RotatingFile { .. }));

        let sinks = LoggerConfig::new("/tmp").with_console(false).sinks();
        assert_eq!(sinks.len(), 1);
    }

    #[test]
    fn test_default_config_path_does_not_panic() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("rotalog/config.toml"));
        }
    }
}
