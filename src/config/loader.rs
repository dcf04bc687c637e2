//! Configuration structures and loading logic.

use crate::api::auth::DEFAULT_TOKEN_KEY;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub link: LinkConfig,
}

/// Credentials configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Environment variable holding the access token. If the variable is
    /// unset, this value is used as the token itself.
    #[serde(default = "default_access_token_key")]
    pub access_token_key: String,
}

/// Store layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Dropbox folder the store keys live under.
    #[serde(default = "default_root")]
    pub root: String,

    /// Local folder mirroring the Dropbox root, if any.
    #[serde(default)]
    pub local_root: Option<PathBuf>,
}

/// Shared link defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Make links force a download (`dl=1`) rather than a preview.
    #[serde(default)]
    pub download: bool,
}

fn default_access_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}

fn default_root() -> String {
    "/".to_string()
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            access_token_key: default_access_token_key(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            local_root: None,
        }
    }
}

impl Config {
    /// Default config file location, `<config dir>/dropboxdol/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dropboxdol").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, else fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.account.access_token_key, "DROPBOX_ACCESS_TOKEN");
        assert_eq!(config.store.root, "/");
        assert!(config.store.local_root.is_none());
        assert!(!config.link.download);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [store]
            local_root = "/home/me/Dropbox"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.root, "/");
        assert_eq!(
            config.store.local_root,
            Some(PathBuf::from("/home/me/Dropbox"))
        );
        assert_eq!(config.account.access_token_key, "DROPBOX_ACCESS_TOKEN");
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.account.access_token_key = "MY_DBX_TOKEN".to_string();
        config.store.root = "/apps/mine".to_string();
        config.link.download = true;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.account.access_token_key, "MY_DBX_TOKEN");
        assert_eq!(loaded.store.root, "/apps/mine");
        assert!(loaded.link.download);
    }

    #[test]
    fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");

        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
        assert_eq!(Config::load_or_default(&path).unwrap().store.root, "/");
    }

    #[test]
    fn test_bad_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[store\nroot = 1").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::TomlParse(_))));
    }
}
