//! Configuration system for the aiclone client
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (AICLONE_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};

/// Environment variable naming the service origin
pub const BACKEND_URL_ENV: &str = "AICLONE_BACKEND_URL";

/// Service origin used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Remote directory and conversation service
    pub service: ServiceSettings,

    /// Logging configuration
    pub logging: LoggingSettings,

    /// Text rendering of views
    pub display: DisplaySettings,
}

/// Service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service origin; endpoints live under `{url}/api/`
    pub url: String,

    /// Per-request timeout in seconds (unset = transport default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

/// View rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Conversations shown on the home view
    pub recent_conversations: usize,

    /// Interests listed per user on the explore view
    pub interest_preview: usize,

    /// Characters of the opening line shown in previews
    pub preview_chars: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_files: 5,
            json_format: false,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            recent_conversations: 4,
            interest_preview: 3,
            preview_chars: 80,
        }
    }
}

impl ClientConfig {
    /// Load configuration from all sources
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            config = Self::from_file(&path)?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Parse one TOML file without overrides or validation
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::IoRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            message: format!("{}: {}", path.display(), e.message()),
            source: Some(e),
        })
    }

    /// Find the configuration file to load
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        // Search in standard locations
        let search_paths = [
            // Current directory
            Some(PathBuf::from("aiclone.toml")),
            // User config directory
            dirs::config_dir().map(|p| p.join("aiclone").join("config.toml")),
            // Home directory
            dirs::home_dir().map(|p| p.join(".aiclone").join("config.toml")),
        ];

        for path in search_paths.iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply `AICLONE_*` environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; unparseable numbers are ignored
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Service settings
        if let Some(val) = lookup(BACKEND_URL_ENV) {
            self.service.url = val;
        }
        if let Some(val) = lookup("AICLONE_REQUEST_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.service.request_timeout_secs = Some(n);
            }
        }

        // Logging settings
        if let Some(val) = lookup("AICLONE_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("AICLONE_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Some(val) = lookup("AICLONE_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }
    }

    fn expand_paths(&mut self) {
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Check every section for values the client cannot run with
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.service.url)
            .map_err(|e| Error::config_field_invalid("service.url", format!("'{}': {}", self.service.url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::config_field_invalid(
                "service.url",
                "Service URL must start with http:// or https://",
            ));
        }

        if self.service.request_timeout_secs == Some(0) {
            return Err(Error::config_field_invalid(
                "service.request_timeout_secs",
                "request_timeout_secs must be at least 1 (omit it for no limit)",
            ));
        }

        if !VALID_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    VALID_LEVELS.join(", ")
                ),
            ));
        }

        if self.display.preview_chars == 0 {
            return Err(Error::config_field_invalid(
                "display.preview_chars",
                "preview_chars must be greater than 0",
            ));
        }

        Ok(())
    }
}

fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Default location used by `config init`
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".aiclone")
        .join("config.toml")
}

/// Write a commented default configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(default_config_path);

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::IoWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|source| Error::IoWrite {
        path: config_path.clone(),
        source,
    })?;

    Ok(config_path)
}

fn generate_default_config() -> String {
    format!(
        r#"# aiclone client configuration

[service]
# Origin of the directory and conversation service ({env} overrides this)
url = "{url}"

# Per-request timeout in seconds (omit to use the transport default)
# request_timeout_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.aiclone/logs/aiclone.log"

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false

[display]
# Conversations shown on the home view
recent_conversations = 4

# Interests listed per user on the explore view
interest_preview = 3

# Characters of the opening line shown in previews
preview_chars = 80
"#,
        env = BACKEND_URL_ENV,
        url = DEFAULT_BACKEND_URL,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.service.url, "http://localhost:8001");
        assert_eq!(config.service.request_timeout_secs, None);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.display.recent_conversations, 4);
        assert_eq!(config.display.preview_chars, 80);
    }

    #[test]
    fn test_env_override() {
        let mut config = ClientConfig::default();
        config.apply_overrides(lookup(&[
            ("AICLONE_BACKEND_URL", "https://clone.example.com"),
            ("AICLONE_REQUEST_TIMEOUT_SECS", "15"),
            ("AICLONE_LOG_LEVEL", "debug"),
            ("AICLONE_LOG_JSON", "1"),
        ]));

        assert_eq!(config.service.url, "https://clone.example.com");
        assert_eq!(config.service.request_timeout_secs, Some(15));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_env_override_ignores_bad_number() {
        let mut config = ClientConfig::default();
        config.apply_overrides(lookup(&[("AICLONE_REQUEST_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.service.request_timeout_secs, None);
    }

    #[test]
    fn test_validation_invalid_scheme() {
        let mut config = ClientConfig::default();
        config.service.url = "ws://localhost:8001".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { field: Some(ref f), .. } if f == "service.url"));
    }

    #[test]
    fn test_validation_unparseable_url() {
        let mut config = ClientConfig::default();
        config.service.url = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = ClientConfig::default();
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let mut config = ClientConfig::default();
        config.service.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = ClientConfig::default();
        config.logging.file = Some("~/logs/aiclone.log".to_string());
        config.expand_paths();
        assert!(!config.logging.file.unwrap().contains('~'));
    }

    #[test]
    fn test_default_file_parses_to_defaults() {
        let parsed: ClientConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(parsed.service.url, DEFAULT_BACKEND_URL);
        assert_eq!(parsed.display.interest_preview, 3);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let config: ClientConfig = toml::from_str(
            r#"
[service]
url = "https://clone.example.com/base"
request_timeout_secs = 20

[display]
recent_conversations = 10
"#,
        )
        .unwrap();

        assert_eq!(config.service.url, "https://clone.example.com/base");
        assert_eq!(config.service.request_timeout_secs, Some(20));
        assert_eq!(config.display.recent_conversations, 10);
        assert_eq!(config.display.preview_chars, 80);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = ClientConfig::load(Some("/nonexistent/aiclone.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[service\nurl = ").unwrap();
        let err = ClientConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_str().unwrap();

        assert_eq!(init_config(Some(path_str), false).unwrap(), path);
        assert!(init_config(Some(path_str), false).is_err());
        assert!(init_config(Some(path_str), true).is_ok());
    }
}
