//! WorkspaceSession - front-end facing coordinator
//!
//! Wraps the [`WorkspaceStore`] behind a mutex and drives the user-level
//! flows (new, open, save, save as, reopen on startup) through the
//! injected [`Ports`]. Failures are shown through the dialog port and
//! reported as `None`/`false`; the store is never left half-updated.
//!
//! The lock is never held while a port is called.

use crate::config::AppPreferences;
use crate::error::{Result, WorkspaceError};
use crate::notifications::Notification;
use crate::ports::{Ports, WORKSPACE_FILES};
use crate::workspace::{scaffold, ExtractorKind, WorkspaceConfig, WorkspaceStore};
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Shared, thread-safe handle to the active workspace
pub struct WorkspaceSession {
    store: Mutex<WorkspaceStore>,
    ports: Ports,
}

impl WorkspaceSession {
    pub fn new(store: WorkspaceStore, ports: Ports) -> Self {
        Self {
            store: Mutex::new(store),
            ports,
        }
    }

    // ========== Workspace lifecycle ==========

    /// Ask for a root folder, scaffold it and make the result the active,
    /// not yet saved workspace.
    pub fn new_workspace(&self, kind: ExtractorKind) -> Option<WorkspaceConfig> {
        let Some(root) = self.ports.picker.pick_folder("Select Root Workspace Folder") else {
            tracing::debug!("New workspace cancelled");
            return None;
        };

        match scaffold(kind, &root) {
            Ok(config) => {
                let mut store = self.store.lock();
                store.set_current(Some(config.clone()));
                store.set_current_path(None);
                Some(config)
            }
            Err(e) => {
                self.show(
                    "Error creating workspace",
                    &format!("An error occurred while creating the workspace: {}", e),
                );
                None
            }
        }
    }

    /// Ask for a workspace file and load it.
    pub fn open_workspace(&self, expected: Option<ExtractorKind>) -> Option<WorkspaceConfig> {
        let Some(path) = self
            .ports
            .picker
            .pick_file_to_open("Open Workspace", &WORKSPACE_FILES)
        else {
            tracing::debug!("Open workspace cancelled");
            return None;
        };

        self.open_workspace_at(&path, expected)
    }

    /// Load a known workspace file.
    pub fn open_workspace_at(
        &self,
        path: &Path,
        expected: Option<ExtractorKind>,
    ) -> Option<WorkspaceConfig> {
        let result = self.store.lock().load_from_file(path, expected);
        match result {
            Ok(config) => Some(config),
            Err(e) => {
                self.report_load_error(path, &e);
                None
            }
        }
    }

    /// Ask for a destination and save the active workspace there.
    ///
    /// The workspace is read again after the picker returns, so edits made
    /// while it was open are part of the save.
    pub fn save_workspace_as(&self) -> bool {
        let suggested = {
            let store = self.store.lock();
            if store.current().is_none() {
                tracing::debug!("No workspace data to save");
                return false;
            }
            store.suggested_file_name()
        };

        let Some(path) =
            self.ports
                .picker
                .pick_file_to_save("Save Workspace", &suggested, &WORKSPACE_FILES)
        else {
            tracing::debug!("Save workspace cancelled");
            return false;
        };

        let result = self.store.lock().save_current_to(&path);
        self.report_save(result)
    }

    /// Save the active workspace to its current path.
    pub fn save_current_workspace(&self) -> bool {
        let result = {
            let mut store = self.store.lock();
            let has_target = store.current().is_some()
                && store
                    .current_path()
                    .is_some_and(|path| !path.as_os_str().is_empty());
            if !has_target {
                tracing::debug!("No current workspace data or path to save");
                return false;
            }
            store.save_current()
        };

        self.report_save(result)
    }

    /// Save in place when the workspace already has a file, otherwise save as.
    pub fn save(&self) -> bool {
        let has_file = {
            let store = self.store.lock();
            store.current().is_some() && store.current_path().is_some_and(Path::is_file)
        };

        if has_file {
            self.save_current_workspace()
        } else {
            self.save_workspace_as()
        }
    }

    fn report_save(&self, result: Result<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.show(
                    "Error saving file",
                    &format!("An error occurred while saving the file: {}", e),
                );
                false
            }
        }
    }

    /// Read a workspace file for inspection. The active workspace and the
    /// last-opened preference are left alone.
    pub fn inspect_workspace(
        &self,
        path: &Path,
        expected: Option<ExtractorKind>,
    ) -> Option<WorkspaceConfig> {
        match WorkspaceStore::read_workspace(path, expected) {
            Ok(config) => Some(config),
            Err(e) => {
                self.report_load_error(path, &e);
                None
            }
        }
    }

    /// Startup: read preferences and, if enabled, reopen the last workspace.
    ///
    /// Returns the kind of the reopened workspace so the caller can pick
    /// the matching editor.
    pub fn reopen_last_workspace(&self) -> Option<ExtractorKind> {
        let preferences = self.load_preferences();

        if !preferences.open_last_workspace_on_startup {
            return None;
        }
        let path = preferences.last_opened_workspace()?.to_path_buf();
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "Last workspace no longer exists");
            return None;
        }

        self.open_workspace_at(&path, None)
            .map(|config| config.kind())
    }

    /// Read preferences, falling back to defaults (with a dialog) when the
    /// file is unreadable.
    pub fn load_preferences(&self) -> AppPreferences {
        let result = self.store.lock().load_preferences().cloned();
        match result {
            Ok(preferences) => preferences,
            Err(e) => {
                tracing::warn!(error = %e, "Error loading settings");
                self.show(
                    "Error loading settings",
                    &format!("An error occurred while loading settings: {}", e),
                );
                AppPreferences::default()
            }
        }
    }

    /// Toggle reopening the last workspace on startup.
    pub fn set_reopen_on_startup(&self, enabled: bool) -> bool {
        let mut preferences = self.load_preferences();
        preferences.open_last_workspace_on_startup = enabled;

        let result = self.store.lock().set_preferences(preferences);

        match result {
            Ok(()) => true,
            Err(e) => {
                self.show(
                    "Error saving settings",
                    &format!("An error occurred while saving settings: {}", e),
                );
                false
            }
        }
    }

    // ========== Shell ==========

    /// Open an existing file or folder with the OS shell.
    pub fn open_in_shell(&self, path: &Path) -> bool {
        if path.as_os_str().is_empty() || !path.exists() {
            self.show(
                "Path Not Found",
                &format!("The selected path \"{}\" does not exist.", path.display()),
            );
            return false;
        }

        match self.ports.launcher.launch(path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to open path");
                self.show("Error", &format!("Failed to open path: {}", path.display()));
                false
            }
        }
    }

    // ========== Pass-throughs ==========

    pub fn current(&self) -> Option<WorkspaceConfig> {
        self.store.lock().current().cloned()
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.store.lock().current_path().map(Path::to_path_buf)
    }

    pub fn is_dirty(&self) -> bool {
        self.store.lock().is_dirty()
    }

    pub fn title(&self) -> String {
        self.store.lock().title()
    }

    pub fn preferences(&self) -> AppPreferences {
        self.store.lock().preferences().clone()
    }

    pub fn subscribe(&self) -> Receiver<Notification> {
        self.store.lock().subscribe()
    }

    /// Edit the active workspace; see [`WorkspaceStore::edit_current`].
    pub fn edit_current<R>(&self, edit: impl FnOnce(&mut WorkspaceConfig) -> R) -> Option<R> {
        self.store.lock().edit_current(edit)
    }

    fn report_load_error(&self, path: &Path, error: &WorkspaceError) {
        tracing::warn!(path = %path.display(), error = %error, "Failed to load workspace");
        match error {
            WorkspaceError::NotFound { .. } => self.show(
                "File not found",
                &format!("The file at path \"{}\" does not exist.", path.display()),
            ),
            WorkspaceError::KindMismatch { expected, got } => self.show(
                "Error",
                &format!(
                    "Loaded workspace data is of incorrect type.\nExpected: {} Got: {}",
                    expected, got
                ),
            ),
            other => self.show(
                "Error loading file",
                &format!("An error occurred while loading the file: {}", other),
            ),
        }
    }

    fn show(&self, title: &str, message: &str) {
        self.ports.dialog.show(title, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreferencesStorage;
    use crate::ports::testing::{Fakes, RecordingDialog, RecordingLauncher};
    use crate::ports::{FileFilter, PathPicker};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::sync::{Arc, Weak};
    use tempfile::TempDir;

    fn test_session(fakes: &Fakes) -> (WorkspaceSession, TempDir) {
        let data_dir = TempDir::new().unwrap();
        let storage = PreferencesStorage::with_data_dir(data_dir.path().to_path_buf());
        let session = WorkspaceSession::new(WorkspaceStore::new(storage), fakes.ports());
        (session, data_dir)
    }

    #[test]
    fn test_session_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WorkspaceSession>();
        assert_send_sync::<Arc<WorkspaceSession>>();
    }

    #[test]
    fn test_new_workspace_then_save_as() {
        let fakes = Fakes::new();
        let (session, _data) = test_session(&fakes);
        let dir = TempDir::new().unwrap();

        fakes.picker.answer(dir.path().join("root"));
        let config = session.new_workspace(ExtractorKind::Scenario).unwrap();
        assert!(config.is_valid());
        assert!(session.is_dirty());
        assert_eq!(session.current_path(), None);

        let file = dir.path().join("scenario.pwaatws");
        fakes.picker.answer(&file);
        assert!(session.save());
        assert_eq!(
            fakes.picker.suggested_names.lock().clone(),
            vec!["Untitled Workspace.pwaatws".to_string()]
        );
        assert!(!session.is_dirty());
        assert_eq!(session.current_path(), Some(file));
        assert!(fakes.dialog.shown.lock().is_empty());
    }

    #[test]
    fn test_cancelled_pickers() {
        let fakes = Fakes::new();
        let (session, _data) = test_session(&fakes);

        assert!(session.new_workspace(ExtractorKind::Binary).is_none());
        assert!(session.open_workspace(None).is_none());
        assert!(!session.save_workspace_as());
        assert!(session.current().is_none());
        assert!(fakes.dialog.shown.lock().is_empty());
    }

    #[test]
    fn test_open_reports_errors() {
        let fakes = Fakes::new();
        let (session, _data) = test_session(&fakes);
        let dir = TempDir::new().unwrap();

        fakes.picker.answer(dir.path().join("missing.pwaatws"));
        assert!(session.open_workspace(None).is_none());

        let garbage = dir.path().join("garbage.pwaatws");
        fs::write(&garbage, b"garbage").unwrap();
        fakes.picker.answer(&garbage);
        assert!(session.open_workspace(None).is_none());

        assert_eq!(
            fakes.dialog.titles(),
            vec!["File not found".to_string(), "Error loading file".to_string()]
        );
    }

    #[test]
    fn test_open_wrong_kind_keeps_workspace() {
        let fakes = Fakes::new();
        let (session, _data) = test_session(&fakes);
        let dir = TempDir::new().unwrap();

        fakes.picker.answer(dir.path().join("bin"));
        session.new_workspace(ExtractorKind::Binary).unwrap();
        let binary_file = dir.path().join("binary.pwaatws");
        fakes.picker.answer(&binary_file);
        assert!(session.save_workspace_as());

        fakes.picker.answer(dir.path().join("crypto"));
        session.new_workspace(ExtractorKind::Cryptography).unwrap();

        fakes.picker.answer(&binary_file);
        assert!(session.open_workspace(Some(ExtractorKind::Scenario)).is_none());

        assert_eq!(
            session.current().map(|c| c.kind()),
            Some(ExtractorKind::Cryptography)
        );
        let shown = fakes.dialog.shown.lock().clone();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, "Error");
        assert!(shown[0].1.contains("Expected: Scenario Got: Binary"));
    }

    #[test]
    fn test_save_current_requires_path() {
        let fakes = Fakes::new();
        let (session, _data) = test_session(&fakes);
        assert!(!session.save_current_workspace());

        let dir = TempDir::new().unwrap();
        fakes.picker.answer(dir.path());
        session.new_workspace(ExtractorKind::Binary).unwrap();
        assert!(!session.save_current_workspace());
    }

    #[test]
    fn test_save_in_place_after_edit() {
        let fakes = Fakes::new();
        let (session, _data) = test_session(&fakes);
        let dir = TempDir::new().unwrap();

        fakes.picker.answer(dir.path());
        session.new_workspace(ExtractorKind::Binary).unwrap();
        let file = dir.path().join("game.pwaatws");
        fakes.picker.answer(&file);
        assert!(session.save());

        session.edit_current(|config| config.set_root_path("/moved"));
        assert!(session.is_dirty());
        assert!(session.title().ends_with("game.pwaatws*"));

        // Existing file: no picker involved
        assert!(session.save());
        assert!(!session.is_dirty());
        assert_eq!(session.current_path(), Some(file));
    }

    #[test]
    fn test_reopen_last_workspace() {
        let fakes = Fakes::new();
        let data_dir = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("crypto.pwaatws");

        {
            let storage = PreferencesStorage::with_data_dir(data_dir.path().to_path_buf());
            let session = WorkspaceSession::new(WorkspaceStore::new(storage), fakes.ports());
            fakes.picker.answer(dir.path());
            session.new_workspace(ExtractorKind::Cryptography).unwrap();
            fakes.picker.answer(&file);
            assert!(session.save_workspace_as());
        }

        let storage = PreferencesStorage::with_data_dir(data_dir.path().to_path_buf());
        let session = WorkspaceSession::new(WorkspaceStore::new(storage), fakes.ports());
        assert_eq!(
            session.reopen_last_workspace(),
            Some(ExtractorKind::Cryptography)
        );
        assert_eq!(session.current_path(), Some(file));

        assert!(session.set_reopen_on_startup(false));
        let storage = PreferencesStorage::with_data_dir(data_dir.path().to_path_buf());
        let session = WorkspaceSession::new(WorkspaceStore::new(storage), fakes.ports());
        assert_eq!(session.reopen_last_workspace(), None);
        assert!(session.current().is_none());
    }

    #[test]
    fn test_reopen_with_corrupt_settings_uses_defaults() {
        let fakes = Fakes::new();
        let (session, data) = test_session(&fakes);
        fs::write(data.path().join("app-settings.json"), "{{{").unwrap();

        assert_eq!(session.reopen_last_workspace(), None);
        assert_eq!(fakes.dialog.titles(), vec!["Error loading settings".to_string()]);
    }

    #[test]
    fn test_open_in_shell() {
        let fakes = Fakes::new();
        let (session, _data) = test_session(&fakes);
        let dir = TempDir::new().unwrap();

        assert!(session.open_in_shell(dir.path()));
        assert!(!session.open_in_shell(&dir.path().join("missing")));
        assert_eq!(fakes.launcher.launched.lock().clone(), vec![dir.path().to_path_buf()]);
        assert_eq!(fakes.dialog.titles(), vec!["Path Not Found".to_string()]);

        let failing = Fakes::with_launcher(RecordingLauncher {
            fail: true,
            ..Default::default()
        });
        let (session, _data) = test_session(&failing);
        assert!(!session.open_in_shell(dir.path()));
        assert_eq!(failing.dialog.titles(), vec!["Error".to_string()]);
    }

    /// Picker that edits the session while the save dialog is open
    struct EditingPicker {
        folder: PathBuf,
        destination: PathBuf,
        session: Mutex<Weak<WorkspaceSession>>,
    }

    impl PathPicker for EditingPicker {
        fn pick_folder(&self, _title: &str) -> Option<PathBuf> {
            Some(self.folder.clone())
        }

        fn pick_file_to_open(&self, _title: &str, _filter: &FileFilter) -> Option<PathBuf> {
            None
        }

        fn pick_file_to_save(
            &self,
            _title: &str,
            _suggested_name: &str,
            _filter: &FileFilter,
        ) -> Option<PathBuf> {
            if let Some(session) = self.session.lock().upgrade() {
                session.edit_current(|config| config.set_root_path("/edited/during/dialog"));
            }
            Some(self.destination.clone())
        }
    }

    #[test]
    fn test_edit_while_save_dialog_open_is_saved() {
        let dir = TempDir::new().unwrap();
        let data_dir = TempDir::new().unwrap();
        let file = dir.path().join("game.pwaatws");
        let picker = Arc::new(EditingPicker {
            folder: dir.path().join("root"),
            destination: file.clone(),
            session: Mutex::new(Weak::new()),
        });
        let dialog = Arc::new(RecordingDialog::default());
        let ports = Ports::new(
            picker.clone(),
            dialog.clone(),
            Arc::new(RecordingLauncher::default()),
        );
        let storage = PreferencesStorage::with_data_dir(data_dir.path().to_path_buf());
        let session = Arc::new(WorkspaceSession::new(WorkspaceStore::new(storage), ports));
        *picker.session.lock() = Arc::downgrade(&session);

        session.new_workspace(ExtractorKind::Binary).unwrap();
        assert!(session.save_workspace_as());

        let current = session.current().unwrap();
        assert_eq!(current.root_path(), Path::new("/edited/during/dialog"));
        assert!(!session.is_dirty());
        let on_disk = WorkspaceStore::read_workspace(&file, None).unwrap();
        assert_eq!(on_disk.root_path(), Path::new("/edited/during/dialog"));
        assert!(dialog.shown.lock().is_empty());
    }

    #[test]
    fn test_inspect_does_not_change_session_or_preferences() {
        let fakes = Fakes::new();
        let (session, data) = test_session(&fakes);
        let dir = TempDir::new().unwrap();

        fakes.picker.answer(dir.path().join("bin"));
        session.new_workspace(ExtractorKind::Binary).unwrap();
        let inspected = dir.path().join("inspected.pwaatws");
        fakes.picker.answer(&inspected);
        assert!(session.save_workspace_as());

        fakes.picker.answer(dir.path().join("crypto"));
        session.new_workspace(ExtractorKind::Cryptography).unwrap();
        let opened = dir.path().join("opened.pwaatws");
        fakes.picker.answer(&opened);
        assert!(session.save_workspace_as());

        let config = session.inspect_workspace(&inspected, None).unwrap();
        assert_eq!(config.kind(), ExtractorKind::Binary);
        assert_eq!(session.current_path(), Some(opened.clone()));

        let storage = PreferencesStorage::with_data_dir(data.path().to_path_buf());
        assert_eq!(
            storage.load().unwrap().last_opened_workspace(),
            Some(opened.as_path())
        );

        assert!(session
            .inspect_workspace(&dir.path().join("missing.pwaatws"), None)
            .is_none());
        assert_eq!(fakes.dialog.titles(), vec!["File not found".to_string()]);
    }

    #[test]
    fn test_subscribers_see_session_changes() {
        let fakes = Fakes::new();
        let (session, _data) = test_session(&fakes);
        let rx = session.subscribe();
        let dir = TempDir::new().unwrap();

        fakes.picker.answer(dir.path());
        session.new_workspace(ExtractorKind::Binary).unwrap();
        assert_eq!(rx.try_iter().count(), 2);
    }
}
