//! Application configuration.
//!
//! Settings come from `<config_dir>/wingman/config.json`, overridden by
//! `WINGMAN__*` environment variables (e.g. `WINGMAN__ADMIN__PASSWORD`).

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::archive::DEFAULT_USERS_FILE;

/// Directory name under the platform config/data roots.
pub const APP_DIR: &str = "wingman";
const CONFIG_FILE: &str = "config.json";
const ENV_PREFIX: &str = "WINGMAN";

/// Placeholder admin login. Not a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    /// Username that opens the admin dashboard.
    pub username: String,
    /// Password checked for the admin username.
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: "A@dMin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Jet catalog CSV imported at startup.
    pub catalog_path: PathBuf,
    /// User archive CSV.
    pub users_path: PathBuf,
    /// Directory for log files.
    pub log_dir: PathBuf,
    /// Seed sample users and a sample booking at startup.
    pub seed_sample_data: bool,
    /// Admin login.
    pub admin: AdminCredentials,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = data_root();
        Self {
            catalog_path: PathBuf::from("jets_data.csv"),
            users_path: data_dir.join(DEFAULT_USERS_FILE),
            log_dir: data_dir.join("logs"),
            seed_sample_data: true,
            admin: AdminCredentials::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default config file and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (optional) layered with environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Persist as pretty JSON, creating parent directories if needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write config {}", path.display()))
    }
}

/// Location of the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

fn data_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Write the default config if no config file exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    if !path.exists() {
        AppConfig::default().persist(&path)?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn persisted_config_loads_back() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("wingman").join("config.json");
        let config = AppConfig {
            catalog_path: dir.path().join("fleet.csv"),
            seed_sample_data: false,
            ..AppConfig::default()
        };
        config.persist(&path)?;

        let loaded = AppConfig::load_from(&path)?;
        assert_eq!(loaded.catalog_path, dir.path().join("fleet.csv"));
        assert!(!loaded.seed_sample_data);
        assert_eq!(loaded.admin, AdminCredentials::default());
        Ok(())
    }

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let loaded = AppConfig::load_from(dir.path().join("absent.json"))?;
        assert_eq!(loaded.catalog_path, PathBuf::from("jets_data.csv"));
        assert!(loaded.seed_sample_data);
        Ok(())
    }

    #[test]
    fn partial_file_fills_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "admin": { "username": "ops", "password": "s3cret" } }"#)?;
        let loaded = AppConfig::load_from(&path)?;
        assert_eq!(loaded.admin.username, "ops");
        assert_eq!(loaded.catalog_path, PathBuf::from("jets_data.csv"));
        Ok(())
    }
}
