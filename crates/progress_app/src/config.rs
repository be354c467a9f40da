use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use progress_engine::SourceSettings;
use progress_logging::LogDestination;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "progress_watch.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid config value `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Settings read from the RON config file. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub client_key: String,
    pub token: Option<String>,
    pub dashboard_interval_ms: u64,
    pub list_interval_ms: u64,
    pub detail_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_response_bytes: u64,
    pub log: LogTarget,
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            client_key: "krn:clnt:demo-company".to_string(),
            token: None,
            dashboard_interval_ms: 1000,
            list_interval_ms: 5000,
            detail_interval_ms: 1000,
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            max_response_bytes: 8 * 1024 * 1024,
            // The terminal is busy with the rendered views.
            log: LogTarget::File,
            log_level: "info".to_string(),
            log_file: PathBuf::from("progress_watch.log"),
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: AppConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// A token given on the command line or via `PROGRESS_TOKEN` wins.
    pub fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "client_key",
                message: "must not be empty".to_string(),
            });
        }
        for (field, value) in [
            ("dashboard_interval_ms", self.dashboard_interval_ms),
            ("list_interval_ms", self.list_interval_ms),
            ("detail_interval_ms", self.detail_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|err| ConfigError::Invalid {
                field: "log_level",
                message: err.to_string(),
            })
    }

    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_bytes: self.max_response_bytes,
        }
    }

    pub fn dashboard_interval(&self) -> Duration {
        Duration::from_millis(self.dashboard_interval_ms)
    }

    pub fn list_interval(&self) -> Duration {
        Duration::from_millis(self.list_interval_ms)
    }

    pub fn detail_interval(&self) -> Duration {
        Duration::from_millis(self.detail_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watch.ron");
        fs::write(
            &path,
            r#"(
                base_url: "https://progress.example.test",
                client_key: "krn:clnt:acme",
                list_interval_ms: 2500,
                log: Both,
                log_level: "debug",
            )"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "https://progress.example.test");
        assert_eq!(config.client_key, "krn:clnt:acme");
        assert_eq!(config.list_interval(), Duration::from_millis(2500));
        assert_eq!(config.detail_interval(), Duration::from_millis(1000));
        assert_eq!(config.log, LogTarget::Both);
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        fs::write(&path, "(base_url: ").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.ron");
        fs::write(&path, "(detail_interval_ms: 0)").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Invalid {
                field: "detail_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let config = AppConfig {
            log_level: "chatty".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn token_override_wins_unless_blank() {
        let config = AppConfig {
            token: Some("from-file".to_string()),
            ..AppConfig::default()
        };
        let kept = config.clone().with_token_override(Some("  ".to_string()));
        assert_eq!(kept.token.as_deref(), Some("from-file"));

        let replaced = config.with_token_override(Some("from-env".to_string()));
        assert_eq!(replaced.token.as_deref(), Some("from-env"));
    }

    #[test]
    fn source_settings_carry_timeouts() {
        let settings = AppConfig::default().source_settings();
        assert_eq!(settings.base_url, "http://localhost:3000");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.max_bytes, 8 * 1024 * 1024);
    }
}
