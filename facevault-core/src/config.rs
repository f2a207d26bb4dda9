//! Configuration management
//!
//! Settings live in settings.json inside the facevault directory:
//! ```json
//! {
//!   "app": {
//!     "apiBaseUrl": "https://gateway.example.com/dev",
//!     "securityPollSecs": 60
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const DEFAULT_IP_ECHO_URL: &str = "https://api64.ipify.org?format=json";
const DEFAULT_POLL_SECS: u64 = 60;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    ip_echo_url: Option<String>,
    #[serde(default)]
    security_poll_secs: Option<u64>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Facevault configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the banking API gateway
    pub api_base_url: String,
    /// JSON IP echo endpoint used for network-trust checks
    pub ip_echo_url: String,
    /// Security monitor interval
    pub security_poll_secs: u64,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            ip_echo_url: DEFAULT_IP_ECHO_URL.to_string(),
            security_poll_secs: DEFAULT_POLL_SECS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the facevault directory
    ///
    /// The API URL and poll interval can be overridden via the
    /// FACEVAULT_API_URL and FACEVAULT_POLL_SECS environment variables
    /// (for CI/testing).
    pub fn load(facevault_dir: &Path) -> Result<Self> {
        let settings_path = facevault_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let api_base_url = std::env::var("FACEVAULT_API_URL")
            .ok()
            .or_else(|| raw.app.api_base_url.clone())
            .unwrap_or_default();

        let security_poll_secs = std::env::var("FACEVAULT_POLL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(raw.app.security_poll_secs)
            .unwrap_or(DEFAULT_POLL_SECS);

        Ok(Self {
            api_base_url,
            ip_echo_url: raw
                .app
                .ip_echo_url
                .clone()
                .unwrap_or_else(|| DEFAULT_IP_ECHO_URL.to_string()),
            security_poll_secs,
            request_timeout_secs: raw.app.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            _raw_settings: raw,
        })
    }

    /// Save config to the facevault directory.
    /// Preserves settings fields this crate doesn't manage.
    pub fn save(&self, facevault_dir: &Path) -> Result<()> {
        let settings_path = facevault_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.api_base_url = Some(self.api_base_url.clone());
        settings.app.ip_echo_url = Some(self.ip_echo_url.clone());
        settings.app.security_poll_secs = Some(self.security_poll_secs);
        settings.app.request_timeout_secs = Some(self.request_timeout_secs);

        std::fs::create_dir_all(facevault_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn security_poll_interval(&self) -> Duration {
        Duration::from_secs(self.security_poll_secs)
    }
}
