use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::errors::{Result, ToolkitError};
use crate::core::models::batch_item::UploadPolicy;

pub const CONFIG_FILE: &str = "config.toml";

/// Configuration read from `<data dir>/config.toml`.
///
/// Every section is optional; a missing file means all defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub key: KeySection,
    pub upload: UploadSection,
    pub history: HistorySection,
}

impl AppConfig {
    /// Load and validate `config.toml` from `data_dir`.
    ///
    /// The history file name is checked so a tampered config cannot point
    /// writes outside the data directory.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content).map_err(|e| ToolkitError::InvalidConfig {
            detail: format!("Failed to parse {CONFIG_FILE}: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.key.fragment_vars.is_empty() {
            return Err(invalid("[key] fragment_vars must name at least one variable"));
        }
        if self.key.fragment_vars.iter().any(|v| v.trim().is_empty()) {
            return Err(invalid("[key] fragment_vars contains an empty name"));
        }
        if self.upload.max_file_size == 0 {
            return Err(invalid("[upload] max_file_size must be greater than 0"));
        }
        if self.upload.max_files == 0 {
            return Err(invalid("[upload] max_files must be greater than 0"));
        }
        crate::cli::context::validate_simple_filename(&self.history.file, "history file")?;
        Ok(())
    }

    /// Render the config as TOML, for `init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ToolkitError::InvalidConfig {
            detail: format!("Failed to serialize config: {e}"),
        })
    }
}

fn invalid(detail: &str) -> ToolkitError {
    ToolkitError::InvalidConfig {
        detail: detail.to_string(),
    }
}

/// The `[key]` section: where the private key and passphrase come from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeySection {
    /// Environment variables holding the key body, in order.
    pub fragment_vars: Vec<String>,
    pub passphrase_var: String,
    /// Recipient public key for `encrypt` when `--recipient` is absent.
    pub public_key_var: String,
}

impl Default for KeySection {
    fn default() -> Self {
        Self {
            fragment_vars: (1..=4).map(|n| format!("PGP_KEY_PART{n}")).collect(),
            passphrase_var: "PGP_PASSPHRASE".into(),
            public_key_var: "PGP_PUBLIC_KEY".into(),
        }
    }
}

/// The `[upload]` section: batch limits.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadSection {
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for UploadSection {
    fn default() -> Self {
        let policy = UploadPolicy::default();
        Self {
            max_file_size: policy.max_file_size,
            max_files: policy.max_files,
        }
    }
}

impl UploadSection {
    pub fn policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_file_size: self.max_file_size,
            max_files: self.max_files,
        }
    }
}

/// The `[history]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistorySection {
    pub enabled: bool,
    pub file: String,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            enabled: true,
            file: "history.json".into(),
        }
    }
}
