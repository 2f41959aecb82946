//! WorkspaceStore - owner of the single active workspace
//!
//! Tracks the live configuration and its backing file against the last
//! persisted snapshot, performs the envelope round trip, and notifies
//! observers on every assignment.

use super::envelope::{self, WORKSPACE_EXTENSION};
use super::types::{ExtractorKind, WorkspaceConfig};
use crate::config::{AppPreferences, PreferencesStorage};
use crate::error::{Result, WorkspaceError};
use crate::notifications::{Notification, Notifier, WorkspaceField};
use crate::path::optional_paths_equal;
use crossbeam_channel::Receiver;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Window title used when no workspace is open
pub const APP_TITLE: &str = "PWAAT Extractor Suite";

/// Display name of a workspace that has no backing file yet
pub const UNTITLED_WORKSPACE: &str = "Untitled Workspace";

/// The active workspace, its backing file and the last saved state
pub struct WorkspaceStore {
    /// Live configuration, edited by the UI
    current: Option<WorkspaceConfig>,

    /// File the live configuration belongs to
    current_path: Option<PathBuf>,

    /// Deep copy taken at the last successful load or save
    saved_snapshot: Option<WorkspaceConfig>,

    /// File the snapshot was loaded from or saved to
    saved_path: Option<PathBuf>,

    is_dirty: bool,

    preferences: AppPreferences,
    preferences_loaded: bool,
    preferences_storage: PreferencesStorage,

    notifier: Notifier,
}

impl WorkspaceStore {
    /// Create an empty store. Preferences start at their defaults until
    /// [`load_preferences`](Self::load_preferences) is called.
    pub fn new(preferences_storage: PreferencesStorage) -> Self {
        Self {
            current: None,
            current_path: None,
            saved_snapshot: None,
            saved_path: None,
            is_dirty: true,
            preferences: AppPreferences::default(),
            preferences_loaded: false,
            preferences_storage,
            notifier: Notifier::new(),
        }
    }

    // ========== State ==========

    pub fn current(&self) -> Option<&WorkspaceConfig> {
        self.current.as_ref()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// Whether the live state differs from the last persisted snapshot
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Register an observer for change notifications
    pub fn subscribe(&mut self) -> Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Replace the live configuration
    pub fn set_current(&mut self, config: Option<WorkspaceConfig>) {
        self.current = config;
        self.changed(WorkspaceField::Config);
    }

    /// Replace the backing file path
    pub fn set_current_path(&mut self, path: Option<PathBuf>) {
        self.current_path = path;
        self.changed(WorkspaceField::Path);
    }

    /// Edit the live configuration in place.
    ///
    /// Returns `None` without notifying when there is no workspace.
    pub fn edit_current<R>(&mut self, edit: impl FnOnce(&mut WorkspaceConfig) -> R) -> Option<R> {
        let result = edit(self.current.as_mut()?);
        self.changed(WorkspaceField::Config);
        Some(result)
    }

    fn changed(&mut self, field: WorkspaceField) {
        self.is_dirty = self.compute_dirty();
        self.notifier
            .notify(Notification::workspace_changed(field, self.is_dirty));
    }

    fn compute_dirty(&self) -> bool {
        let Some(snapshot) = &self.saved_snapshot else {
            return true;
        };
        let config_matches = self
            .current
            .as_ref()
            .is_some_and(|current| snapshot.structurally_equals(current));

        !config_matches
            || !optional_paths_equal(self.saved_path.as_deref(), self.current_path.as_deref())
    }

    // ========== Persistence ==========

    /// Load a workspace file and make it the active workspace.
    ///
    /// With `expected` set, a workspace of another kind is rejected and the
    /// store is left untouched.
    pub fn load_from_file(
        &mut self,
        path: &Path,
        expected: Option<ExtractorKind>,
    ) -> Result<WorkspaceConfig> {
        let config = Self::read_workspace(path, expected)?;

        tracing::info!(path = %path.display(), kind = %config.kind(), "Loaded workspace");
        self.commit(config.clone(), path);
        Ok(config)
    }

    /// Read and decode a workspace file without touching any store state
    /// or preferences.
    pub fn read_workspace(path: &Path, expected: Option<ExtractorKind>) -> Result<WorkspaceConfig> {
        if !path.exists() {
            return Err(WorkspaceError::not_found(path));
        }

        let bytes = fs::read(path)
            .map_err(|e| WorkspaceError::io_context(e, "Failed to read workspace", path))?;

        let mut config = envelope::decode(&bytes)
            .map_err(|e| WorkspaceError::corrupt(path, e.to_string()))?;

        if let Some(expected) = expected {
            if config.kind() != expected {
                return Err(WorkspaceError::KindMismatch {
                    expected,
                    got: config.kind(),
                });
            }
        }

        config.load_side_documents();
        Ok(config)
    }

    /// Save `config` to `path` and make it the active workspace.
    ///
    /// The envelope is written beside the target and only renamed over it
    /// once the side documents are written, so a failure leaves the
    /// destination as it was.
    pub fn save_to_file(&mut self, path: &Path, config: WorkspaceConfig) -> Result<()> {
        let bytes =
            envelope::encode(&config).map_err(|e| WorkspaceError::Serialization(e.to_string()))?;

        let temp_path = write_temp(path, &bytes)?;
        if let Err(e) = config.save_side_documents() {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        replace_with(&temp_path, path)?;

        tracing::info!(path = %path.display(), kind = %config.kind(), "Saved workspace");
        self.commit(config, path);
        Ok(())
    }

    /// Re-save the active workspace to its current path
    pub fn save_current(&mut self) -> Result<()> {
        let path = self
            .current_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| WorkspaceError::invalid_operation("Workspace has no file path"))?;

        self.save_current_to(&path)
    }

    /// Save the active workspace, as it is now, to `path`
    pub fn save_current_to(&mut self, path: &Path) -> Result<()> {
        let config = self
            .current
            .clone()
            .ok_or_else(|| WorkspaceError::invalid_operation("No workspace to save"))?;

        self.save_to_file(path, config)
    }

    fn commit(&mut self, config: WorkspaceConfig, path: &Path) {
        self.saved_snapshot = Some(config.clone());
        self.saved_path = Some(path.to_path_buf());
        self.current = Some(config);
        self.current_path = Some(path.to_path_buf());

        // Both fields land before observers hear about either
        self.is_dirty = self.compute_dirty();
        for field in [WorkspaceField::Config, WorkspaceField::Path] {
            self.notifier
                .notify(Notification::workspace_changed(field, self.is_dirty));
        }

        self.record_last_opened(path);
    }

    // ========== Preferences ==========

    pub fn preferences(&self) -> &AppPreferences {
        &self.preferences
    }

    /// Read preferences from disk, creating the file on first run
    pub fn load_preferences(&mut self) -> Result<&AppPreferences> {
        self.preferences = self.preferences_storage.load()?;
        self.preferences_loaded = true;
        Ok(&self.preferences)
    }

    /// Replace and persist preferences
    pub fn set_preferences(&mut self, preferences: AppPreferences) -> Result<()> {
        self.preferences_storage.save(&preferences)?;
        self.preferences = preferences;
        self.preferences_loaded = true;
        Ok(())
    }

    fn record_last_opened(&mut self, path: &Path) {
        // Keep the other settings from disk if nobody has read them yet
        if !self.preferences_loaded {
            if let Ok(preferences) = self.preferences_storage.load() {
                self.preferences = preferences;
                self.preferences_loaded = true;
            }
        }

        self.preferences.last_opened_workspace_path = path.to_string_lossy().into_owned();
        if let Err(e) = self.preferences_storage.save(&self.preferences) {
            tracing::warn!(error = %e, "Failed to save preferences");
            self.notifier.notify(Notification::warning(format!(
                "An error occurred while saving settings: {}",
                e
            )));
        }
    }

    // ========== Display ==========

    /// Window title: app name, workspace file name and a `*` when dirty
    pub fn title(&self) -> String {
        if self.current.is_none() {
            return APP_TITLE.to_string();
        }

        let name = self
            .current_path
            .as_deref()
            .filter(|p| p.is_file())
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED_WORKSPACE.to_string());
        let marker = if self.is_dirty { "*" } else { "" };

        format!("{} - {}{}", APP_TITLE, name, marker)
    }

    /// File name offered by a save dialog
    pub fn suggested_file_name(&self) -> String {
        let stem = self
            .current_path
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNTITLED_WORKSPACE.to_string());

        format!("{}.{}", stem, WORKSPACE_EXTENSION)
    }
}

/// Write `bytes` to a sibling `<name>.tmp` file and return its path.
fn write_temp(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        WorkspaceError::invalid_operation(format!("Not a file path: {}", path.display()))
    })?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let written = fs::File::create(&temp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(WorkspaceError::io_context(e, "Failed to write workspace", path));
    }
    Ok(temp_path)
}

/// Rename a finished temp file over `path`.
fn replace_with(temp_path: &Path, path: &Path) -> Result<()> {
    fs::rename(temp_path, path).map_err(|e| {
        let _ = fs::remove_file(temp_path);
        WorkspaceError::io_context(e, "Failed to save workspace", path)
    })
}
