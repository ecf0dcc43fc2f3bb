use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strongbox_core::autolock::{AutoLockConfig, DEFAULT_AUTO_LOCK_SECONDS};
use strongbox_core::crypto::MIN_MASTER_PASSWORD_LENGTH;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StrongboxConfig {
    #[serde(default)]
    pub vault: VaultSection,
    #[serde(default)]
    pub security: SecuritySection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VaultSection {
    pub path: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SecuritySection {
    #[serde(default = "default_true")]
    pub auto_lock_enabled: bool,
    #[serde(default = "default_auto_lock_seconds")]
    pub auto_lock_seconds: u64,
    #[serde(default = "default_min_length")]
    pub min_master_password_length: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub filter: Option<String>,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            auto_lock_enabled: true,
            auto_lock_seconds: DEFAULT_AUTO_LOCK_SECONDS,
            min_master_password_length: MIN_MASTER_PASSWORD_LENGTH,
        }
    }
}

impl SecuritySection {
    pub fn auto_lock(&self) -> AutoLockConfig {
        AutoLockConfig {
            enabled: self.auto_lock_enabled,
            timeout_seconds: self.auto_lock_seconds,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_auto_lock_seconds() -> u64 {
    DEFAULT_AUTO_LOCK_SECONDS
}

fn default_min_length() -> usize {
    MIN_MASTER_PASSWORD_LENGTH
}

impl StrongboxConfig {
    pub fn new(vault_path: &Path, email: &str) -> Self {
        Self {
            vault: VaultSection {
                path: Some(vault_path.to_string_lossy().to_string()),
                email: Some(email.to_string()),
            },
            ..Self::default()
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_vault_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("vault.json"))
}

/// Local identity cache consulted when the vault file has no identity.
pub fn default_identity_cache_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("identity-cache.json"))
}

pub fn read_config(path: &Path) -> anyhow::Result<StrongboxConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Read the config at `path`, or defaults when it does not exist.
pub fn read_config_or_default(path: &Path) -> anyhow::Result<StrongboxConfig> {
    if path.exists() {
        read_config(path)
    } else {
        Ok(StrongboxConfig::default())
    }
}

pub fn write_config(path: &Path, config: &StrongboxConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("strongbox"));
        }
    }
    Ok(home_dir()?.join(".config").join("strongbox"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("strongbox"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("strongbox"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
