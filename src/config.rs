use crate::core::error::{Error, Result};
use crate::core::ids::DEFAULT_ID_LEN;
use crate::fonts::{DEFAULT_FONT_DIR, DEFAULT_FONT_FILE};
use crate::utils::get_config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound for `font_load_timeout_secs` (10 minutes)
pub const MAX_FONT_LOAD_TIMEOUT_SECS: u64 = 600;

/// Settings for the editor helpers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Prefix for resource URLs that are not absolute (e.g. a CDN origin)
    #[serde(default)]
    pub resource_host: String,
    /// Local directory that root-relative font URLs are resolved against
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    #[serde(default = "default_font_dir")]
    pub font_dir: String,
    #[serde(default = "default_font_file")]
    pub font_file: String,
    /// Timeout in seconds for a single font load (default: 30s, clamped to 1..=600)
    #[serde(default = "default_font_load_timeout")]
    pub font_load_timeout_secs: u64,
    /// Length of generated element ids
    #[serde(default = "default_id_length")]
    pub id_length: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            resource_host: String::new(),
            asset_root: default_asset_root(),
            font_dir: default_font_dir(),
            font_file: default_font_file(),
            font_load_timeout_secs: default_font_load_timeout(),
            id_length: default_id_length(),
        }
    }
}

impl EditorConfig {
    pub fn font_load_timeout(&self) -> Duration {
        Duration::from_secs(
            self.font_load_timeout_secs
                .clamp(1, MAX_FONT_LOAD_TIMEOUT_SECS),
        )
    }
}

fn default_asset_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_font_dir() -> String {
    DEFAULT_FONT_DIR.to_string()
}

fn default_font_file() -> String {
    DEFAULT_FONT_FILE.to_string()
}

fn default_font_load_timeout() -> u64 {
    30
}

fn default_id_length() -> usize {
    DEFAULT_ID_LEN
}

/// Path of `config.json` in the platform config directory
pub fn config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.json"))
}

/// Reads a config file; missing fields take their defaults.
///
/// # Async
/// Uses `tokio::fs` for non-blocking I/O.
pub async fn load_config_from(path: &Path) -> Result<EditorConfig> {
    let json = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&json)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}

/// Loads the config from the platform config directory, or returns defaults
/// if it is missing or unreadable.
pub async fn load_config() -> EditorConfig {
    if let Some(path) = config_path() {
        match load_config_from(&path).await {
            Ok(config) => return config,
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Ignoring config: {e}"),
        }
    }
    EditorConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.font_dir, "/assets/fonts");
        assert_eq!(config.font_file, "font.woff");
        assert_eq!(config.id_length, 10);
    }

    #[test]
    fn test_timeout_is_clamped() {
        let mut config = EditorConfig {
            font_load_timeout_secs: 0,
            ..EditorConfig::default()
        };
        assert_eq!(config.font_load_timeout(), Duration::from_secs(1));

        config.font_load_timeout_secs = u64::MAX;
        assert_eq!(config.font_load_timeout(), Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"resource_host": "https://cdn.example.com", "id_length": 16}"#,
        )
        .unwrap();

        let config = load_config_from(&path).await.unwrap();
        assert_eq!(config.resource_host, "https://cdn.example.com");
        assert_eq!(config.id_length, 16);
        assert_eq!(config.font_load_timeout_secs, 30);
    }

    #[tokio::test]
    async fn test_load_config_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_config_from(&path).await,
            Err(Error::Config(_))
        ));
        assert!(matches!(
            load_config_from(&dir.path().join("missing.json")).await,
            Err(Error::Io(_))
        ));
    }
}
