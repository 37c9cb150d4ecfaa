//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/actlog/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/actlog/` (~/.config/actlog/)
//! - Data: `$XDG_DATA_HOME/actlog/` (~/.local/share/actlog/)
//! - State/Logs: `$XDG_STATE_HOME/actlog/` (~/.local/state/actlog/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
pub(crate) fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Event store limits
    #[serde(default)]
    pub store: StoreConfig,

    /// Analytics thresholds and window sizes
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Collector limits and polling interval
    #[serde(default)]
    pub collection: CollectionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Retention and dedup settings for the event store
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum rows kept in `activity_log`; oldest rows are evicted first
    #[serde(default = "default_max_records")]
    pub max_records: usize,

    /// Minutes during which an event with the same hash is suppressed
    #[serde(default = "default_dedup_window_minutes")]
    pub dedup_window_minutes: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
            dedup_window_minutes: default_dedup_window_minutes(),
        }
    }
}

impl StoreConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.max_records == 0 {
            return Err(Error::Config(
                "store.max_records must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Dedup window as a chrono duration
    pub fn dedup_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.dedup_window_minutes))
    }
}

fn default_max_records() -> usize {
    10_000
}

fn default_dedup_window_minutes() -> u32 {
    5
}

/// Analytics configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Trailing window for the productivity score and top hours
    #[serde(default = "default_score_window_days")]
    pub score_window_days: u32,

    /// Maximum gap between two events of the same work session
    #[serde(default = "default_session_gap_minutes")]
    pub session_gap_minutes: u32,

    /// Sessions at least this long trigger the break insight
    #[serde(default = "default_long_session_minutes")]
    pub long_session_minutes: u32,

    /// Number of hours reported as most productive
    #[serde(default = "default_top_hours")]
    pub top_hours: usize,

    /// Number of commands in the command pattern table
    #[serde(default = "default_top_n")]
    pub top_commands: usize,

    /// Number of files in the file pattern table
    #[serde(default = "default_top_n")]
    pub top_files: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            score_window_days: default_score_window_days(),
            session_gap_minutes: default_session_gap_minutes(),
            long_session_minutes: default_long_session_minutes(),
            top_hours: default_top_hours(),
            top_commands: default_top_n(),
            top_files: default_top_n(),
        }
    }
}

impl AnalyticsConfig {
    /// Longest accepted trailing window, in days
    pub const MAX_WINDOW_DAYS: u32 = 36_500;

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.score_window_days > Self::MAX_WINDOW_DAYS {
            return Err(Error::Config(format!(
                "analytics.score_window_days must be at most {}",
                Self::MAX_WINDOW_DAYS
            )));
        }
        Ok(())
    }
}

fn default_score_window_days() -> u32 {
    7
}

fn default_session_gap_minutes() -> u32 {
    30
}

fn default_long_session_minutes() -> u32 {
    120
}

fn default_top_hours() -> usize {
    3
}

fn default_top_n() -> usize {
    10
}

/// Collector configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Shell history lines recorded per collection
    #[serde(default = "default_bash_commands")]
    pub bash_commands: usize,

    /// Process snapshots recorded per collection
    #[serde(default = "default_processes")]
    pub processes: usize,

    /// Open files recorded per collection
    #[serde(default = "default_files")]
    pub files: usize,

    /// Seconds between cycles in watch mode
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Override for the shell history file (defaults to ~/.bash_history)
    pub history_file: Option<PathBuf>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            bash_commands: default_bash_commands(),
            processes: default_processes(),
            files: default_files(),
            interval_secs: default_interval_secs(),
            history_file: None,
        }
    }
}

impl CollectionConfig {
    /// Resolved shell history path, expanding a leading `~/`
    pub fn history_path(&self) -> PathBuf {
        match &self.history_file {
            Some(path) => expand_home(path),
            None => home_dir().join(".bash_history"),
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home_dir().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

fn default_bash_commands() -> usize {
    10
}

fn default_processes() -> usize {
    5
}

fn default_files() -> usize {
    10
}

fn default_interval_secs() -> u64 {
    60
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.store.validate()?;
        config.analytics.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/actlog/config.toml` (~/.config/actlog/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("actlog").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/actlog/` (~/.local/share/actlog/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("actlog")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/actlog/` (~/.local/state/actlog/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("actlog")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/actlog/activity.db` (~/.local/share/actlog/activity.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("activity.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/actlog/actlog.log` (~/.local/state/actlog/actlog.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("actlog.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.max_records, 10_000);
        assert_eq!(config.store.dedup_window_minutes, 5);
        assert_eq!(config.analytics.session_gap_minutes, 30);
        assert_eq!(config.analytics.score_window_days, 7);
        assert_eq!(config.collection.interval_secs, 60);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[store]
max_records = 500
dedup_window_minutes = 10

[analytics]
session_gap_minutes = 45
top_hours = 5

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.store.max_records, 500);
        assert_eq!(config.store.dedup_window(), chrono::Duration::minutes(10));
        assert_eq!(config.analytics.session_gap_minutes, 45);
        assert_eq!(config.analytics.top_hours, 5);
        // Unset fields keep their defaults
        assert_eq!(config.analytics.long_session_minutes, 120);
        assert_eq!(config.collection.bash_commands, 10);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_store_config_validation() {
        assert!(StoreConfig::default().validate().is_ok());

        let config = StoreConfig {
            max_records: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_analytics_config_validation() {
        assert!(AnalyticsConfig::default().validate().is_ok());

        let config = AnalyticsConfig {
            score_window_days: AnalyticsConfig::MAX_WINDOW_DAYS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let config = AnalyticsConfig {
            score_window_days: 200_000_000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_oversized_score_window() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analytics]\nscore_window_days = 200000000\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("score_window_days"));
    }

    #[test]
    fn test_history_path_expands_home() {
        let config = CollectionConfig {
            history_file: Some(PathBuf::from("~/.zsh_history")),
            ..Default::default()
        };
        assert_eq!(config.history_path(), home_dir().join(".zsh_history"));

        let config = CollectionConfig {
            history_file: Some(PathBuf::from("/var/log/history")),
            ..Default::default()
        };
        assert_eq!(config.history_path(), PathBuf::from("/var/log/history"));
    }
}
