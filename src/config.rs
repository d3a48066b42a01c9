//! Tenant settings
//!
//! Settings are read from `<config dir>/config.toml` (or the file passed with
//! `--config`). Each field can be overridden by an environment variable:
//!
//! | Key             | Environment variable |
//! |-----------------|----------------------|
//! | `base_url`      | `ZNT_BASE_URL`       |
//! | `client_id`     | `ZNT_CLIENT_ID`      |
//! | `client_secret` | `ZNT_CLIENT_SECRET`  |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Settings file name inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

pub const ENV_BASE_URL: &str = "ZNT_BASE_URL";
pub const ENV_CLIENT_ID: &str = "ZNT_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "ZNT_CLIENT_SECRET";

/// A required setting that neither the file nor the environment provides
#[derive(Debug, thiserror::Error)]
#[error("missing setting '{key}': add it to {file} or set {env}")]
pub struct MissingSetting {
    pub key: &'static str,
    pub env: &'static str,
    pub file: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    base_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

/// Connection settings for one tenant
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Settings {
    /// Default settings file location
    pub fn default_path() -> Result<PathBuf> {
        Ok(paths::config_dir()?.join(CONFIG_FILE))
    }

    /// Load settings from `path` (or the default location) and the process
    /// environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => paths::expand(&p.to_string_lossy()),
            None => Self::default_path()?,
        };
        Self::load_with(&path, |key| std::env::var(key).ok())
    }

    /// Load settings from `path`, taking overrides from `env`
    ///
    /// A missing file is not an error as long as the environment supplies
    /// every value.
    pub fn load_with<F>(path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            toml::from_str::<SettingsFile>(&content)
                .with_context(|| format!("Invalid settings in {}", path.display()))?
        } else {
            log::debug!("No settings file at {}", path.display());
            SettingsFile::default()
        };

        let file_name = path.display().to_string();
        let resolve = |key: &'static str, env_key: &'static str, value: Option<String>| {
            env(env_key)
                .filter(|v| !v.trim().is_empty())
                .inspect(|_| log::debug!("{} taken from {}", key, env_key))
                .or(value.filter(|v| !v.trim().is_empty()))
                .ok_or_else(|| MissingSetting {
                    key,
                    env: env_key,
                    file: file_name.clone(),
                })
        };

        Ok(Self {
            base_url: resolve("base_url", ENV_BASE_URL, file.base_url)?,
            client_id: resolve("client_id", ENV_CLIENT_ID, file.client_id)?,
            client_secret: resolve("client_secret", ENV_CLIENT_SECRET, file.client_secret)?,
        })
    }

    /// Client configuration for the HTTP backend
    pub fn client_config(&self) -> zuora::ClientConfig {
        zuora::ClientConfig {
            base_url: self.base_url.clone(),
            credentials: zuora::Credentials {
                client_id: self.client_id.clone(),
                client_secret: self.client_secret.clone(),
            },
        }
    }
}
