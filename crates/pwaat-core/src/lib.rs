//! PWAAT Core - Workspace engine for the PWAAT extractor suite
//!
//! This crate provides the UI-agnostic workspace functionality:
//! - Typed workspace configurations (Binary, Scenario, Cryptography)
//! - The `.pwaatws` file format and scenario speaker definitions
//! - Dirty tracking against the last saved snapshot
//! - Scaffolding of a workspace directory tree from a root folder
//! - Application preferences
//!
//! Any front end (GUI, terminal) consumes this crate through
//! `WorkspaceSession` and supplies the `Ports` it needs.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐   new/open/save  ┌──────────────────┐
//! │   Any front end   │ ────────────────→│ WorkspaceSession │
//! │  (Ports: picker,  │                  │  WorkspaceStore  │
//! │  dialog, launcher)│ ←────────────────│                  │
//! └───────────────────┘   Notification   └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pwaat_core::{ExtractorKind, Notification, WorkspaceSession};
//!
//! let session = WorkspaceSession::new(store, ports);
//! let changes = session.subscribe();
//!
//! session.new_workspace(ExtractorKind::Scenario);
//! session.save();
//!
//! for notif in changes.try_iter() {
//!     if let Notification::WorkspaceChanged { .. } = notif {
//!         println!("{}", session.title());
//!     }
//! }
//! ```

// Public API modules
pub mod error;
pub mod notifications;
pub mod path;
pub mod ports;

// Preferences
pub mod config;

// Workspace model, file format and store
pub mod workspace;

// Front-end facing coordinator
mod session;

// Re-export commonly used types
pub use config::{AppPreferences, PreferencesStorage};
pub use error::{Result, WorkspaceError};
pub use notifications::{Notification, WorkspaceField};
pub use path::paths_equal;
pub use ports::{FileFilter, NotificationDialog, PathPicker, Ports, ShellLauncher};
pub use session::WorkspaceSession;
pub use workspace::{
    scaffold, BinaryWorkspace, CryptographyWorkspace, ExtractorKind, ScenarioWorkspace,
    SpeakerEntry, SpeakerRegistry, WorkspaceConfig, WorkspaceStore,
};
