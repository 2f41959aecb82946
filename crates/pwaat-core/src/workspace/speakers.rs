//! Speaker registry
//!
//! The id → name table owned by scenario workspaces. It is persisted as a
//! side document next to the workspace file:
//!
//! ```json
//! { "Speakers": [ { "Id": 0, "Name": "Unknown Speaker" } ] }
//! ```
//!
//! Ids are not required to be unique.

use crate::error::{Result, WorkspaceError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name written for the seed entry of a fresh speaker document
pub const UNKNOWN_SPEAKER: &str = "Unknown Speaker";

/// A single speaker definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpeakerEntry {
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

impl SpeakerEntry {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// On-disk shape of the speaker definitions file
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SpeakerDocument {
    #[serde(default)]
    speakers: Vec<SpeakerEntry>,
}

/// Ordered, editable list of speaker definitions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerRegistry {
    entries: Vec<SpeakerEntry>,
}

impl SpeakerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<SpeakerEntry>) -> Self {
        Self { entries }
    }

    /// Registry holding only the `{0, "Unknown Speaker"}` seed entry
    pub fn seeded() -> Self {
        Self::from_entries(vec![SpeakerEntry::new(0, UNKNOWN_SPEAKER)])
    }

    /// Entries in edit order
    pub fn entries(&self) -> &[SpeakerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append a blank `{0, ""}` row and return its index
    pub fn add_entry(&mut self) -> usize {
        self.entries.push(SpeakerEntry::new(0, String::new()));
        self.entries.len() - 1
    }

    pub fn push(&mut self, entry: SpeakerEntry) {
        self.entries.push(entry);
    }

    /// Remove the entry at `index`
    pub fn remove(&mut self, index: usize) -> Option<SpeakerEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Change the id of one entry. Returns `true` only if the value changed.
    pub fn set_id(&mut self, index: usize, id: u32) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) if entry.id != id => {
                entry.id = id;
                true
            }
            _ => false,
        }
    }

    /// Change the name of one entry. Returns `true` only if the value changed.
    pub fn set_name(&mut self, index: usize, name: &str) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) if entry.name != name => {
                entry.name = name.to_string();
                true
            }
            _ => false,
        }
    }

    /// Entries ordered by id, ties broken by name
    pub fn sorted(&self) -> Vec<SpeakerEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort();
        sorted
    }

    /// Multiset equality, independent of edit order
    pub fn structurally_equals(&self, other: &SpeakerRegistry) -> bool {
        self.entries.len() == other.entries.len() && self.sorted() == other.sorted()
    }

    /// Strictly load a speaker document.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WorkspaceError::not_found(path)
            } else {
                WorkspaceError::io_context(e, "Failed to read speaker definitions", path)
            }
        })?;

        let document: SpeakerDocument = serde_json::from_str(&content)
            .map_err(|e| WorkspaceError::corrupt(path, e.to_string()))?;

        Ok(Self::from_entries(document.speakers))
    }

    /// Load a speaker document, degrading to an empty registry.
    ///
    /// A blank path or missing file yields an empty registry silently; an
    /// unreadable or malformed document is logged.
    pub fn load_or_empty(path: &Path) -> Self {
        if path.as_os_str().is_empty() || !path.is_file() {
            return Self::new();
        }

        match Self::load(path) {
            Ok(registry) => {
                tracing::debug!(
                    path = %path.display(),
                    count = registry.len(),
                    "Loaded speaker definitions"
                );
                registry
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Ignoring unreadable speaker definitions"
                );
                Self::new()
            }
        }
    }

    /// Write the registry, sorted by id, to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let document = SpeakerDocument {
            speakers: self.sorted(),
        };
        let content = serde_json::to_string_pretty(&document)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    WorkspaceError::io_context(e, "Failed to create directory", parent)
                })?;
            }
        }

        fs::write(path, content)
            .map_err(|e| WorkspaceError::io_context(e, "Failed to write speaker definitions", path))
    }
}

impl FromIterator<SpeakerEntry> for SpeakerRegistry {
    fn from_iter<I: IntoIterator<Item = SpeakerEntry>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}
