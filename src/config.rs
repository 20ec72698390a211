use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,

    pub database: DatabaseConfig,

    pub provider: ProviderConfig,

    pub tmdb: TmdbConfig,

    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite:data/tivarr.db`.
    pub path: String,

    /// Maximum database connections (default: 5)
    pub max_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "sqlite:data/tivarr.db".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

/// Xtream-compatible provider account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub server_url: String,

    pub username: String,

    pub password: String,

    /// Kept as text; some providers embed it into the server URL instead.
    pub port: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            username: String::new(),
            password: String::new(),
            port: "80".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// Metadata enrichment is skipped entirely when unset.
    pub api_key: Option<String>,

    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: "es-ES".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// EPG programmes older than this are pruned.
    pub epg_retention_days: i64,

    /// Watch history entries older than this are pruned.
    pub history_retention_days: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            epg_retention_days: 7,
            history_retention_days: 90,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            database: DatabaseConfig::default(),
            provider: ProviderConfig::default(),
            tmdb: TmdbConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_config_path();
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("tivarr").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".tivarr").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.path.is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if !self.provider.server_url.is_empty()
            && (self.provider.username.is_empty() || self.provider.password.is_empty())
        {
            anyhow::bail!("Provider credentials are required when a server URL is set");
        }

        if self.provider.server_url.is_empty() && !self.provider.username.is_empty() {
            anyhow::bail!("Provider server URL cannot be empty when credentials are set");
        }

        if self.sync.epg_retention_days <= 0 || self.sync.history_retention_days <= 0 {
            anyhow::bail!("Retention periods must be at least one day");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, "sqlite:data/tivarr.db");
        assert_eq!(config.provider.port, "80");
        assert_eq!(config.tmdb.language, "es-ES");
        assert_eq!(config.sync.epg_retention_days, 7);
        assert_eq!(config.sync.history_retention_days, 90);
        assert!(config.tmdb.api_key.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[provider]"));
        assert!(toml_str.contains("[tmdb]"));
        assert!(toml_str.contains("[sync]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [provider]
            server_url = "http://example.com:8080"
            username = "demo"
            password = "secret"

            [sync]
            epg_retention_days = 3
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.server_url, "http://example.com:8080");
        assert_eq!(config.sync.epg_retention_days, 3);

        assert_eq!(config.sync.history_retention_days, 90);
        assert_eq!(config.database.path, "sqlite:data/tivarr.db");
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let mut config = Config::default();
        config.provider.server_url = "http://example.com".to_string();
        assert!(config.validate().is_err());

        config.provider.username = "demo".to_string();
        config.provider.password = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_orphan_credentials() {
        let mut config = Config::default();
        config.provider.username = "demo".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_retention() {
        let mut config = Config::default();
        config.sync.epg_retention_days = 0;
        assert!(config.validate().is_err());
    }
}
