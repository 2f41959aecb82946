//! Collaborator ports
//!
//! Capabilities the core needs from whatever front end hosts it. None of
//! them assume a GUI: a terminal front end answers pickers from its
//! arguments and prints dialogs to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File type filter offered by file pickers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
}

/// Filter for `*.pwaatws` workspace files
pub const WORKSPACE_FILES: FileFilter = FileFilter {
    name: "Workspace Files",
    patterns: &["*.pwaatws"],
};

/// Folder and file selection. Every method returns zero or one path;
/// `None` means the user cancelled.
pub trait PathPicker: Send + Sync {
    fn pick_folder(&self, title: &str) -> Option<PathBuf>;

    fn pick_file_to_open(&self, title: &str, filter: &FileFilter) -> Option<PathBuf>;

    fn pick_file_to_save(
        &self,
        title: &str,
        suggested_name: &str,
        filter: &FileFilter,
    ) -> Option<PathBuf>;
}

/// Blocking notification shown to the user
pub trait NotificationDialog: Send + Sync {
    fn show(&self, title: &str, message: &str);
}

/// Opens a file or folder with the OS shell
pub trait ShellLauncher: Send + Sync {
    fn launch(&self, path: &Path) -> std::io::Result<()>;
}

/// The set of ports a [`WorkspaceSession`](crate::WorkspaceSession) talks to
#[derive(Clone)]
pub struct Ports {
    pub picker: Arc<dyn PathPicker>,
    pub dialog: Arc<dyn NotificationDialog>,
    pub launcher: Arc<dyn ShellLauncher>,
}

impl Ports {
    pub fn new(
        picker: Arc<dyn PathPicker>,
        dialog: Arc<dyn NotificationDialog>,
        launcher: Arc<dyn ShellLauncher>,
    ) -> Self {
        Self {
            picker,
            dialog,
            launcher,
        }
    }
}
