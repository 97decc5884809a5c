//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `UNSPLASH_GALLERY_*` environment variables (nested keys separated by `__`,
//! e.g. `UNSPLASH_GALLERY_UNSPLASH__TIMEOUT_SECS=10`). The access key also
//! falls back to `UNSPLASH_ACCESS_KEY`.

mod file_config;

pub use file_config::{
    default_config_path, mask_secret, read_config_file, save_config, ConfigFileError,
};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sources::UNSPLASH_API_BASE;
use crate::utils::DEFAULT_TIMEOUT_SECS;

/// Environment variable holding the Unsplash access key
pub const ACCESS_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

/// Prefix for environment overrides read by [`load_config`]
pub const ENV_PREFIX: &str = "UNSPLASH_GALLERY";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Unsplash API settings
    #[serde(default)]
    pub unsplash: UnsplashConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Unsplash API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsplashConfig {
    /// Access key sent as `client_id`
    #[serde(default = "access_key_from_env")]
    pub access_key: Option<String>,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            access_key: access_key_from_env(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn access_key_from_env() -> Option<String> {
    std::env::var(ACCESS_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

fn default_base_url() -> String {
    UNSPLASH_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when no `-v` flag or `RUST_LOG` is given
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn env_overrides() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(env_overrides())
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from environment variables and defaults only
pub fn get_config() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(env_overrides())
        .build()?;

    settings.try_deserialize()
}

/// Find a configuration file in the default locations
///
/// Checks `./unsplash-gallery.toml` first, then the per-user config
/// directory.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("unsplash-gallery.toml");
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file() -> NamedTempFile {
        tempfile::Builder::new().suffix(".toml").tempfile().unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.unsplash.base_url, "https://api.unsplash.com");
        assert_eq!(config.unsplash.timeout_secs, 30);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_config_file() {
        let mut file = toml_file();
        writeln!(
            file,
            r#"
[unsplash]
access_key = "file-key"
base_url = "http://localhost:9999"
timeout_secs = 5

[logging]
level = "debug"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.unsplash.access_key.as_deref(), Some("file-key"));
        assert_eq!(config.unsplash.base_url, "http://localhost:9999");
        assert_eq!(config.unsplash.timeout_secs, 5);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_config_partial_file_uses_defaults() {
        let mut file = toml_file();
        writeln!(file, "[unsplash]\naccess_key = \"k\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.unsplash.base_url, "https://api.unsplash.com");
        assert_eq!(config.unsplash.timeout_secs, 30);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Path::new("/nonexistent/unsplash-gallery.toml")).is_err());
    }
}
