use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub downloads: DownloadsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Console appearance and identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Enable dark theme
    #[serde(default = "default_true")]
    pub dark_theme: bool,
    /// Name recorded as the author of every change
    #[serde(default = "default_actor")]
    pub actor: String,
    /// Open the admin panel right away
    #[serde(default)]
    pub start_in_admin_mode: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            dark_theme: true,
            actor: default_actor(),
            start_in_admin_mode: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_actor() -> String {
    "Admin".to_string()
}

/// Site backend connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent with every request
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Seconds between background snapshot refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            timeout_secs: default_timeout(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_refresh_interval() -> u64 {
    15
}

/// Media archive settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadsConfig {
    /// Target directory for archives (user download folder if unset)
    #[serde(default)]
    pub directory: Option<String>,
    /// Compression level (0-9)
    #[serde(default = "default_compression")]
    pub compression_level: u8,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            directory: None,
            compression_level: default_compression(),
        }
    }
}

impl DownloadsConfig {
    /// Resolve the archive directory
    pub fn resolve_directory(&self) -> Result<PathBuf> {
        match &self.directory {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => crate::download::default_download_dir(),
        }
    }
}

fn default_compression() -> u8 {
    6
}

/// Photo-book catalog override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub path: Option<String>,
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("de", "weddingpix", "WeddingPix Admin")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::info!("Loaded configuration from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("No configuration file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.console.dark_theme);
        assert_eq!(config.console.actor, "Admin");
        assert!(!config.console.start_in_admin_mode);
        assert_eq!(config.backend.base_url, "http://localhost:3001");
        assert_eq!(config.backend.refresh_interval(), Duration::from_secs(15));
        assert_eq!(config.downloads.compression_level, 6);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[console]
actor = "Trauzeugin"

[backend]
base_url = "https://hochzeit.example"
"#,
        )
        .unwrap();

        assert_eq!(config.console.actor, "Trauzeugin");
        assert!(config.console.dark_theme);
        assert_eq!(config.backend.base_url, "https://hochzeit.example");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.downloads.compression_level, 6);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.console.dark_theme = false;
        config.backend.api_token = Some("secret".to_string());
        config.downloads.directory = Some("/srv/exports".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.console.dark_theme);
        assert_eq!(loaded.backend.api_token.as_deref(), Some("secret"));
        assert_eq!(loaded.downloads.directory.as_deref(), Some("/srv/exports"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.console.actor, "Admin");
    }

    #[test]
    fn test_zero_durations_are_clamped() {
        let backend = BackendConfig {
            timeout_secs: 0,
            refresh_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(backend.timeout(), Duration::from_secs(1));
        assert_eq!(backend.refresh_interval(), Duration::from_secs(1));
    }
}
