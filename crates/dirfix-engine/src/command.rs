//! Inbound commands and outbound notifications.
//!
//! The wire shape is a tagged JSON object: `{"action": "toggle",
//! "enabled": true}`, `{"action": "mode", "mode": "manual"}`,
//! `{"action": "applyManual"}`, `{"action": "resetChanges"}`. A payload
//! whose action matches no variant fails to deserialize and is dropped at
//! the transport edge.

use serde::{Deserialize, Serialize};

use dirfix_settings::Mode;

/// A command delivered to the engine from the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    /// Turn processing on or off.
    Toggle { enabled: bool },
    /// Switch application policy and re-run initialization.
    Mode { mode: Mode },
    /// Style every tagged element; only honored in manual mode.
    ApplyManual,
    /// Revert all engine-applied styling and tags.
    ResetChanges,
}

/// A notification sent back to the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Notification {
    /// At least one visual change has been applied to the document.
    ChangesApplied,
}

/// Receiver for outbound notifications.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Discards every notification.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _notification: Notification) {}
}
