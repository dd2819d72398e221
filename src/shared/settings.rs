use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::errors::{BridgeError, BridgeResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    pub gestures: GestureSettings,
    pub automation: AutomationSettings,
    pub shell: ShellSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    pub default_tap_duration_ms: u64,
    /// Upper clamp applied to every gesture duration
    pub max_duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationSettings {
    pub thread_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellSettings {
    /// URI or path opened to reach the accessibility permission screen
    pub settings_target: String,
    /// Launcher program receiving the package id; the system opener when unset
    pub launch_program: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            gestures: GestureSettings::default(),
            automation: AutomationSettings::default(),
            shell: ShellSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            default_tap_duration_ms: 50,
            max_duration_ms: 60_000,
        }
    }
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            thread_name: "automation-ctx".to_string(),
        }
    }
}

impl Default for ShellSettings {
    fn default() -> Self {
        Self {
            settings_target: default_settings_target().to_string(),
            launch_program: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(target_os = "macos")]
fn default_settings_target() -> &'static str {
    "x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility"
}

#[cfg(target_os = "windows")]
fn default_settings_target() -> &'static str {
    "ms-settings:easeofaccess"
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn default_settings_target() -> &'static str {
    "settings://accessibility"
}

impl BridgeSettings {
    pub fn settings_path() -> BridgeResult<PathBuf> {
        ProjectDirs::from("com", "antigravity", "assistive-bridge")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| BridgeError::Settings("Failed to determine config directory".to_string()))
    }

    /// Load from the per-user config directory, writing defaults on first run
    pub async fn load() -> BridgeResult<Self> {
        let path = Self::settings_path()?;
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> BridgeResult<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.save_to(path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| BridgeError::Settings(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| BridgeError::Settings(format!("Failed to parse settings: {}", e)))
    }

    pub async fn save(&self) -> BridgeResult<()> {
        let path = Self::settings_path()?;
        self.save_to(&path).await
    }

    pub async fn save_to(&self, path: &Path) -> BridgeResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BridgeError::Settings(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;

        fs::write(path, content)
            .await
            .map_err(|e| BridgeError::Settings(format!("Failed to write settings file: {}", e)))
    }
}
