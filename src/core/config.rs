//! Tool configuration management

use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::store::DOCUMENT_KEY;

/// Tool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Preference file override
    pub preferences_path: Option<PathBuf>,
    /// Directory image handles are resolved against
    pub asset_root: Option<PathBuf>,
    /// Key the document is stored under
    pub document_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preferences_path: None,
            asset_root: None,
            document_key: DOCUMENT_KEY.to_string(),
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "gdd-tool", "GddTool")
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    /// Load configuration from a file, using defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Get the preference file the document lives in
    pub fn preferences_file(&self) -> PathBuf {
        self.preferences_path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("preferences.json"))
                .unwrap_or_else(|| PathBuf::from("preferences.json"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.document_key, "GDDDocument");
    }

    #[test]
    fn test_save_and_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("config.json");
        let config = AppConfig {
            preferences_path: Some(dir.path().join("prefs.json")),
            asset_root: Some(dir.path().join("assets")),
            document_key: "MyGame".to_string(),
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.preferences_file(), dir.path().join("prefs.json"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"asset_root": "/tmp/art"}"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.asset_root, Some(PathBuf::from("/tmp/art")));
        assert_eq!(config.document_key, DOCUMENT_KEY);
    }
}
