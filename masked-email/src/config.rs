// masked-email/src/config.rs
use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_KEY_ENV: &str = "FASTMAIL_API_KEY";
pub const ACCOUNT_ID_ENV: &str = "FASTMAIL_ACCOUNT_ID";

const CONFIG_DIR_NAME: &str = "masked-fastmail";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// API token (bearer) for the JMAP API
    #[serde(default)]
    pub token: String,
    /// Account id; discovered from the JMAP session when absent
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_session_url")]
    pub session_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.fastmail.com/jmap/api".to_string()
}

fn default_session_url() -> String {
    "https://api.fastmail.com/jmap/session".to_string()
}

fn default_timeout_secs() -> u64 {
    jmap_client::DEFAULT_TIMEOUT.as_secs()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            account_id: None,
            api_url: default_api_url(),
            session_url: default_session_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load the config file if there is one, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Override credentials from the environment. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.token = token.trim().to_string();
        }
        if let Some(account_id) = lookup(ACCOUNT_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.account_id = Some(account_id.trim().to_string());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(anyhow!(
                "{} environment variable must be set (or `token` in {})",
                API_KEY_ENV,
                CONFIG_FILE_NAME
            ));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn config_path() -> Result<PathBuf> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("Cannot determine config directory"))?;
        Ok(base_dirs
            .config_dir()
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }
}
