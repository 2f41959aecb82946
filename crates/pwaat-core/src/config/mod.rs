//! Configuration module for PWAAT Core
//!
//! Handles loading and saving of the per-installation preferences file
//! stored in the application data folder.

mod preferences;

pub use preferences::{AppPreferences, PreferencesStorage, DATA_DIR_ENV};
