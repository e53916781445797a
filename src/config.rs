//! Configuration handling for pritunl-ctl

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DAEMON_URL: &str = "http://127.0.0.1:9770";
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "pritunl-auth";
const CONFIG_DIR_NAME: &str = "pritunl-ctl";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub daemon: DaemonConfig,
    pub profiles: ProfilesConfig,
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Base URL of the local Pritunl client service
    pub url: String,
    /// File holding the service auth key; platform default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_key_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilesConfig {
    /// Directory with `*.conf` / `*.ovpn` profile files; platform default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub keychain_service: String,
    /// Prompt for a one-time code on connect; platform default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_time_code: Option<bool>,
}

/// Ordering of listed profiles by id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ids compared as text, so "10" sorts before "2"
    #[default]
    Lexical,
    Numeric,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DAEMON_URL.to_string(),
            auth_key_path: None,
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            keychain_service: DEFAULT_KEYCHAIN_SERVICE.to_string(),
            one_time_code: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::ReadError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.daemon.url, "http://127.0.0.1:9770");
        assert_eq!(config.credentials.keychain_service, "pritunl-auth");
        assert_eq!(config.profiles.order, SortOrder::Lexical);
        assert!(config.credentials.one_time_code.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [profiles]
            order = "numeric"
            "#,
        )
        .unwrap();
        assert_eq!(config.profiles.order, SortOrder::Numeric);
        assert_eq!(config.daemon.url, DEFAULT_DAEMON_URL);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.credentials.one_time_code = Some(true);
        config.daemon.auth_key_path = Some(PathBuf::from("/tmp/auth"));
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.credentials.one_time_code, Some(true));
        assert_eq!(loaded.daemon.auth_key_path, Some(PathBuf::from("/tmp/auth")));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.daemon.url, DEFAULT_DAEMON_URL);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles\norder = 3").unwrap();

        let result = Config::load_or_default(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
