//! Application preferences
//!
//! A small JSON record kept in the application data folder:
//!
//! ```json
//! { "OpenLastWorkspaceOnStartup": true, "LastOpenedWorkspacePath": "" }
//! ```

use crate::error::{Result, WorkspaceError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "PWAAT_SUITE_DATA_DIR";

const APP_DIR_NAME: &str = "pwaat-extractor-suite";
const SETTINGS_FILE_NAME: &str = "app-settings.json";

/// Durable per-installation preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AppPreferences {
    /// Reload the last workspace when the application starts
    pub open_last_workspace_on_startup: bool,

    /// Path of the most recently loaded or saved workspace file
    pub last_opened_workspace_path: String,
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            open_last_workspace_on_startup: true,
            last_opened_workspace_path: String::new(),
        }
    }
}

impl AppPreferences {
    /// Last opened workspace, if one is recorded
    pub fn last_opened_workspace(&self) -> Option<&Path> {
        let path = self.last_opened_workspace_path.trim();
        (!path.is_empty()).then(|| Path::new(path))
    }
}

/// Disk storage for [`AppPreferences`]
#[derive(Debug, Clone)]
pub struct PreferencesStorage {
    /// Application data folder
    data_dir: PathBuf,

    /// Path to the settings file
    settings_path: PathBuf,
}

impl PreferencesStorage {
    /// Storage in the default location.
    ///
    /// `PWAAT_SUITE_DATA_DIR` wins over the platform data directory.
    pub fn new() -> Result<Self> {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(Self::with_data_dir(PathBuf::from(dir)));
            }
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| {
                WorkspaceError::invalid_operation("Could not determine application data directory")
            })?
            .join(APP_DIR_NAME);

        Ok(Self::with_data_dir(data_dir))
    }

    /// Create with custom data directory (for testing)
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            settings_path: data_dir.join(SETTINGS_FILE_NAME),
            data_dir,
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Ensure the data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(|e| {
                WorkspaceError::io_context(e, "Failed to create data directory", &self.data_dir)
            })?;
        }
        Ok(())
    }

    /// Load preferences, writing defaults on first run.
    pub fn load(&self) -> Result<AppPreferences> {
        if !self.settings_path.exists() {
            tracing::info!(
                path = %self.settings_path.display(),
                "Settings file not found, creating new one"
            );
            let defaults = AppPreferences::default();
            self.save(&defaults)?;
            return Ok(defaults);
        }

        let content = fs::read_to_string(&self.settings_path).map_err(|e| {
            WorkspaceError::io_context(e, "Failed to read settings", &self.settings_path)
        })?;

        serde_json::from_str(&content)
            .map_err(|e| WorkspaceError::corrupt(&self.settings_path, e.to_string()))
    }

    /// Save preferences atomically.
    pub fn save(&self, preferences: &AppPreferences) -> Result<()> {
        self.ensure_data_dir()?;

        let content = serde_json::to_string_pretty(preferences)?;

        // Write atomically using temp file
        let temp_path = self.settings_path.with_extension("json.tmp");
        fs::write(&temp_path, &content)
            .map_err(|e| WorkspaceError::io_context(e, "Failed to write settings", &temp_path))?;

        fs::rename(&temp_path, &self.settings_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            WorkspaceError::io_context(e, "Failed to save settings", &self.settings_path)
        })
    }
}
