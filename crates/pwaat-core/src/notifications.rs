//! Notifications that the workspace core sends to any UI
//!
//! Observers subscribe to a [`Notifier`] and receive a channel of
//! [`Notification`]s. A single logical load or save produces one
//! `WorkspaceChanged` per mutated field, so observers should re-read the
//! state they care about instead of counting events.

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Which part of the active workspace changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkspaceField {
    /// The configuration itself
    Config,

    /// The backing file path
    Path,
}

/// Notifications that the core sends to any UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    /// The active workspace or its path was assigned
    WorkspaceChanged {
        /// Which field was assigned
        field: WorkspaceField,

        /// Dirty state after the assignment
        is_dirty: bool,
    },

    /// Non-fatal problem worth surfacing
    Warning {
        /// Warning text
        message: String,
    },
}

impl Notification {
    /// Create a WorkspaceChanged notification
    pub fn workspace_changed(field: WorkspaceField, is_dirty: bool) -> Self {
        Notification::WorkspaceChanged { field, is_dirty }
    }

    /// Create a Warning notification
    pub fn warning(message: impl Into<String>) -> Self {
        Notification::Warning {
            message: message.into(),
        }
    }
}

/// Fan-out of notifications to every live subscriber
#[derive(Debug, Default)]
pub struct Notifier {
    subscribers: Vec<Sender<Notification>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer
    pub fn subscribe(&mut self) -> Receiver<Notification> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to every subscriber, dropping the ones that hung up
    pub fn notify(&mut self, notification: Notification) {
        self.subscribers
            .retain(|tx| tx.send(notification.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
