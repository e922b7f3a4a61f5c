//! Configuration management for the client.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default API origin when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;
const DEFAULT_MAX_POLLS: u32 = 200;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "AUTOREPLY_API_URL";
pub const ENV_APP_ORIGIN: &str = "AUTOREPLY_APP_ORIGIN";
pub const ENV_LOG_LEVEL: &str = "AUTOREPLY_LOG_LEVEL";

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Base API origin, without the `/api/v1` prefix.
    pub api_url: Option<String>,
    /// Origin of the hosting context. When it is https, an http API origin
    /// is upgraded to https.
    pub app_origin: Option<String>,
    /// Delay between task status polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Number of polls after which a task is abandoned.
    pub max_polls: u32,
    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_url: None,
            app_origin: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_polls: DEFAULT_MAX_POLLS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the config file if present, then apply
    /// environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    fn load_from_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(api_url) = non_empty(ENV_API_URL) {
            self.api_url = Some(api_url);
        }
        if let Some(app_origin) = non_empty(ENV_APP_ORIGIN) {
            self.app_origin = Some(app_origin);
        }
        if let Some(log_level) = non_empty(ENV_LOG_LEVEL) {
            self.log_level = log_level;
        }
    }

    /// Reject values that would make the client unusable.
    pub fn validate(&self) -> CoreResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(CoreError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_polls == 0 {
            return Err(CoreError::Config(
                "max_polls must be greater than zero".to_string(),
            ));
        }
        if let Some(api_url) = &self.api_url {
            Url::parse(api_url.trim())?;
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(config.api_url.is_none());
        assert!(config.app_origin.is_none());
        assert_eq!(config.poll_interval(), Duration::from_millis(3_000));
        assert_eq!(config.max_polls, 200);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_load_from_file_partial() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        std::fs::write(
            &config_path,
            r#"{ "log_level": "debug", "api_url": "https://api.example.com" }"#,
        )
        .unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.max_polls, 200);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config {
            poll_interval_ms: 500,
            max_polls: 10,
            ..Default::default()
        };
        config.save(&paths).unwrap();

        let loaded = Config::load_from_file(&paths.config_file()).unwrap();
        assert_eq!(loaded.poll_interval_ms, 500);
        assert_eq!(loaded.max_polls, 10);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[
            (ENV_API_URL, " https://api.example.com/ "),
            (ENV_APP_ORIGIN, "https://app.example.com"),
            (ENV_LOG_LEVEL, "trace"),
        ]));

        assert_eq!(config.api_url.as_deref(), Some("https://api.example.com/"));
        assert_eq!(config.app_origin.as_deref(), Some("https://app.example.com"));
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let mut config = Config {
            api_url: Some("https://from-file.example.com".to_string()),
            ..Default::default()
        };
        config.apply_overrides(lookup(&[(ENV_API_URL, "   "), (ENV_LOG_LEVEL, "")]));

        assert_eq!(
            config.api_url.as_deref(),
            Some("https://from-file.example.com")
        );
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = Config {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_max_polls() {
        let config = Config {
            max_polls: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_invalid_api_url() {
        let config = Config {
            api_url: Some("not a valid url".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::InvalidUrl(_))));
    }
}
