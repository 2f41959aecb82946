//! Workspace management module
//!
//! The typed workspace model, its file format and the store that tracks
//! the active workspace against what is on disk.
//!
//! # Architecture
//!
//! ```text
//! WorkspaceStore
//!     │
//!     ├── current / current_path        (live, edited by the UI)
//!     ├── saved_snapshot / saved_path   (deep copy at last load/save)
//!     │
//!     ├── envelope   <file>.pwaatws     (tagged record, length-prefixed)
//!     ├── speakers   speaker_definitions.json (scenario side document)
//!     └── PreferencesStorage            (last opened workspace)
//!
//! scaffold(kind, root) ──→ directory tree + WorkspaceConfig
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pwaat_core::{scaffold, ExtractorKind, PreferencesStorage, WorkspaceStore};
//!
//! let mut store = WorkspaceStore::new(PreferencesStorage::new()?);
//! let config = scaffold(ExtractorKind::Binary, "/games/pwaat".as_ref())?;
//! store.save_to_file("/games/pwaat.pwaatws".as_ref(), config)?;
//! assert!(!store.is_dirty());
//! ```

pub mod envelope;
mod speakers;
mod store;
mod types;
mod wizard;

pub use envelope::WORKSPACE_EXTENSION;
pub use speakers::{SpeakerEntry, SpeakerRegistry, UNKNOWN_SPEAKER};
pub use store::{WorkspaceStore, APP_TITLE, UNTITLED_WORKSPACE};
pub use types::{
    BinaryWorkspace, CryptographyWorkspace, ExtractorKind, ScenarioWorkspace, WorkspaceConfig,
};
pub use wizard::{scaffold, SPEAKER_DEFINITIONS_FILE};
