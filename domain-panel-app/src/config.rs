//! JSON configuration file
//!
//! Located under the platform config directory (`<config>/domain-panel/config.json`)
//! unless a path is given explicitly. A missing file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use domain_panel_core::config::{PanelSettings, ShellOverrides};
use domain_panel_core::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

use crate::DEFAULT_VIEWPORT_WIDTH;

const APP_DIR_NAME: &str = "domain-panel";
const CONFIG_FILE_NAME: &str = "config.json";
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024; // 1MB

/// Preference file kept next to the configuration.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Environment variable overriding `apiBaseUrl`.
pub const API_BASE_ENV: &str = "DOMAIN_PANEL_API_BASE";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Base URL of the domain-list API.
    pub api_base_url: String,
    /// Polling period in milliseconds.
    pub refresh_interval_ms: u64,
    /// Viewports narrower than this keep their current view mode.
    pub mobile_breakpoint: u32,
    /// Width reported to the view-mode logic.
    pub viewport_width: u32,
    /// Host presentation flags.
    pub overrides: ShellOverrides,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = PanelSettings::default();
        Self {
            api_base_url: "http://127.0.0.1:8008".to_string(),
            refresh_interval_ms: u64::try_from(settings.refresh_interval.as_millis())
                .unwrap_or(u64::MAX),
            mobile_breakpoint: settings.mobile_breakpoint,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            overrides: ShellOverrides::default(),
        }
    }
}

impl AppConfig {
    /// Platform config directory for this application.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
    }

    /// Default configuration file path.
    pub fn default_path() -> Option<PathBuf> {
        Self::default_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Load from `path`; a missing file yields the defaults.
    pub async fn load(path: &Path) -> CoreResult<Self> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("Config file does not exist: {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CoreError::ConfigError(format!(
                    "Failed to read config file metadata: {e}"
                )))
            }
        };

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(CoreError::ConfigError(format!(
                "Config file too large: {} bytes (max: {MAX_CONFIG_FILE_SIZE} bytes)",
                metadata.len()
            )));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CoreError::ConfigError(format!("Failed to read config file: {e}")))?;

        serde_json::from_str(&content).map_err(|e| {
            CoreError::ConfigError(format!("Invalid config file {}: {e}", path.display()))
        })
    }

    /// Replace the API base URL when `value` is a non-empty string.
    #[must_use]
    pub fn with_api_base_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        self
    }

    /// Apply `DOMAIN_PANEL_API_BASE`.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.with_api_base_override(std::env::var(API_BASE_ENV).ok())
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(CoreError::ConfigError("apiBaseUrl must not be empty".to_string()));
        }
        if self.refresh_interval_ms == 0 {
            return Err(CoreError::ConfigError(
                "refreshIntervalMs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Panel parameters derived from this configuration.
    pub fn settings(&self) -> PanelSettings {
        PanelSettings {
            refresh_interval: Duration::from_millis(self.refresh_interval_ms),
            mobile_breakpoint: self.mobile_breakpoint,
            ..PanelSettings::default()
        }
    }
}
