//! Configuration file support for unsplash-gallery.
//!
//! # Configuration File Format
//!
//! ```toml
//! [unsplash]
//! access_key = "your-access-key"
//! base_url = "https://api.unsplash.com"
//! timeout_secs = 30
//!
//! [logging]
//! level = "warn"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// Per-user configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("unsplash-gallery").join("config.toml"))
}

/// Read a TOML configuration file without environment overrides
pub fn read_config_file(path: &Path) -> Result<Config, ConfigFileError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
}

/// Write a configuration to a TOML file, creating parent directories
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }

    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Hide all but the last four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.unsplash.access_key = Some("saved-key".to_string());
        config.unsplash.timeout_secs = 12;
        config.logging.level = "debug".to_string();

        save_config(&config, &path).unwrap();

        let loaded = read_config_file(&path).unwrap();
        assert_eq!(loaded.unsplash.access_key.as_deref(), Some("saved-key"));
        assert_eq!(loaded.unsplash.timeout_secs, 12);
        assert_eq!(loaded.logging.level, "debug");
    }

    #[test]
    fn test_read_nonexistent() {
        let result = read_config_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigFileError::Io(_))));
    }

    #[test]
    fn test_read_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        let result = read_config_file(&path);
        assert!(matches!(result, Err(ConfigFileError::Parse(_))));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcdefgh"), "****efgh");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "");
    }
}
