//! Application configuration
//!
//! TOML configuration selecting the corpus backend (snapshot file vs
//! PostgreSQL), the fingerprinting service endpoint, the similarity
//! thresholds and where uploaded audio is stored. Environment variables
//! override the file.

use crate::config::Thresholds;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const FINGERPRINT_URL_ENV: &str = "FINGERPRINT_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    #[serde(default)]
    pub fingerprint_service: FingerprintServiceConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub review: ReviewConfig,
}

/// Corpus storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default)]
    pub filesystem: FilesystemConfig,
    #[serde(default)]
    pub postgresql: PostgresqlConfig,
}

/// Storage backend type
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    Postgresql,
}

/// Snapshot file backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilesystemConfig {
    /// JSON or BSON corpus snapshot
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

fn default_snapshot_path() -> String {
    "./corpus.json".to_string()
}

/// PostgreSQL backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostgresqlConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for PostgresqlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database: default_database(),
            user: default_user(),
            password: default_password(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    5432
}
fn default_database() -> String {
    "copyreg".to_string()
}
fn default_user() -> String {
    "copyreg_user".to_string()
}
fn default_password() -> String {
    "copyreg_pass".to_string()
}
fn default_max_connections() -> u32 {
    10
}

/// External fingerprinting service
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FingerprintServiceConfig {
    #[serde(default = "default_fingerprint_url")]
    pub url: String,
    /// Request timeout; the transport default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for FingerprintServiceConfig {
    fn default() -> Self {
        Self {
            url: default_fingerprint_url(),
            timeout_secs: None,
        }
    }
}

fn default_fingerprint_url() -> String {
    "http://localhost:8000/api/fingerprint".to_string()
}

/// Track review settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReviewConfig {
    /// Directory holding uploaded audio files
    #[serde(default = "default_tracks_dir")]
    pub tracks_dir: PathBuf,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            tracks_dir: default_tracks_dir(),
        }
    }
}

fn default_tracks_dir() -> PathBuf {
    PathBuf::from("./storage/tracks")
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig =
            toml::from_str(&content).context("Failed to parse TOML config")?;
        Ok(config)
    }

    /// Load from TOML, apply environment overrides and validate
    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup
    pub fn apply_overrides<L>(&mut self, lookup: L)
    where
        L: Fn(&str) -> Option<String>,
    {
        self.thresholds = Thresholds::from_settings(&lookup, &self.thresholds);
        if let Some(url) = lookup(FINGERPRINT_URL_ENV).filter(|u| !u.trim().is_empty()) {
            log::debug!("{} overrides fingerprint service url", FINGERPRINT_URL_ENV);
            self.fingerprint_service.url = url;
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> anyhow::Result<()> {
        self.thresholds.validate()?;
        if self.fingerprint_service.url.trim().is_empty() {
            anyhow::bail!("fingerprint_service.url must not be empty");
        }
        if self.fingerprint_service.timeout_secs == Some(0) {
            anyhow::bail!("fingerprint_service.timeout_secs must be > 0");
        }
        Ok(())
    }

    /// Create a default filesystem configuration
    pub fn default_filesystem() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Filesystem,
                filesystem: FilesystemConfig::default(),
                postgresql: PostgresqlConfig::default(),
            },
            fingerprint_service: FingerprintServiceConfig::default(),
            thresholds: Thresholds::default(),
            review: ReviewConfig::default(),
        }
    }
}
