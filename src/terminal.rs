//! Terminal implementations of the core's ports

use parking_lot::Mutex;
use pwaat_core::{FileFilter, NotificationDialog, PathPicker, ShellLauncher};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Answers pickers with paths taken from the command line, in order.
/// Running out of answers reads as a cancelled picker.
#[derive(Default)]
pub struct ArgumentPicker {
    answers: Mutex<VecDeque<PathBuf>>,
}

impl ArgumentPicker {
    pub fn answer(&self, path: impl Into<PathBuf>) {
        self.answers.lock().push_back(path.into());
    }

    fn next(&self, title: &str) -> Option<PathBuf> {
        let answer = self.answers.lock().pop_front();
        match &answer {
            Some(path) => tracing::debug!(title, path = %path.display(), "Picker answered"),
            None => tracing::debug!(title, "Picker has no answer"),
        }
        answer
    }
}

impl PathPicker for ArgumentPicker {
    fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        self.next(title)
    }

    fn pick_file_to_open(&self, title: &str, _filter: &FileFilter) -> Option<PathBuf> {
        self.next(title)
    }

    fn pick_file_to_save(
        &self,
        title: &str,
        _suggested_name: &str,
        _filter: &FileFilter,
    ) -> Option<PathBuf> {
        self.next(title)
    }
}

/// Prints dialogs to stderr
pub struct StderrDialog;

impl NotificationDialog for StderrDialog {
    fn show(&self, title: &str, message: &str) {
        eprintln!("{}: {}", title, message);
    }
}

/// Opens paths with the platform's default handler
pub struct OsLauncher;

impl ShellLauncher for OsLauncher {
    fn launch(&self, path: &Path) -> std::io::Result<()> {
        open::that(path)
    }
}
