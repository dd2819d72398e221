use async_trait::async_trait;

use super::automation::PlatformShell;
use crate::shared::errors::{BridgeError, BridgeResult};
use crate::shared::settings::ShellSettings;

/// Launcher and settings surfaces backed by the system opener
#[derive(Debug, Clone)]
pub struct DesktopShell {
    settings_target: String,
    launch_program: Option<String>,
}

impl DesktopShell {
    pub fn new(settings: &ShellSettings) -> Self {
        Self {
            settings_target: settings.settings_target.clone(),
            launch_program: settings.launch_program.clone(),
        }
    }

    async fn open(target: String) -> Result<(), String> {
        tokio::task::spawn_blocking(move || opener::open(&target))
            .await
            .map_err(|e| format!("opener task failed: {}", e))?
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl PlatformShell for DesktopShell {
    async fn launch_app(&self, package_id: &str) -> BridgeResult<bool> {
        let package_id = package_id.trim();
        if package_id.is_empty() {
            return Ok(false);
        }

        match &self.launch_program {
            Some(program) => {
                let status = tokio::process::Command::new(program)
                    .arg(package_id)
                    .status()
                    .await
                    .map_err(|e| {
                        BridgeError::PlatformError(format!("Failed to run launcher {}: {}", program, e))
                    })?;
                if !status.success() {
                    tracing::info!("[Shell] launcher could not resolve {}: {}", package_id, status);
                }
                Ok(status.success())
            }
            None => match Self::open(package_id.to_string()).await {
                Ok(()) => Ok(true),
                Err(e) => {
                    tracing::info!("[Shell] could not open {}: {}", package_id, e);
                    Ok(false)
                }
            },
        }
    }

    async fn open_automation_settings(&self) -> BridgeResult<()> {
        Self::open(self.settings_target.clone())
            .await
            .map_err(|e| BridgeError::PlatformError(format!("Failed to open automation settings: {}", e)))
    }
}
