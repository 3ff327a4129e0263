//! Controller events for renderers.
//!
//! The controller publishes one event per state change on a broadcast
//! channel. A renderer can redraw from [`crate::ControllerState`] on every
//! event, or apply events incrementally (the terminal front-end prints reveal
//! steps as deltas this way).
//!
//! # Example
//!
//! ```rust
//! use docchat::events::ControllerEvent;
//!
//! let event = ControllerEvent::BusyChanged { busy: true };
//! let json = serde_json::to_string(&event).unwrap();
//! assert!(json.contains("busy.changed"));
//! ```

use serde::{Deserialize, Serialize};

use crate::chat::{Message, MessageId};
use crate::document::DocumentAssociation;
use crate::health::HealthPanel;
use crate::notify::Notification;

/// One observable change of controller state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum ControllerEvent {
    // ─────────────────────────────────────────────────────────────────────
    // Conversation
    // ─────────────────────────────────────────────────────────────────────
    /// A message was added at the end of the list.
    #[serde(rename = "message.appended")]
    MessageAppended(Message),

    /// A message's content changed (reveal step).
    #[serde(rename = "message.updated")]
    MessageUpdated {
        /// Target message.
        id: MessageId,
        /// Full content after the update.
        content: String,
    },

    /// The message list was replaced wholesale (history load or clear).
    #[serde(rename = "messages.reset")]
    MessagesReset {
        /// New list.
        messages: Vec<Message>,
    },

    /// A reveal started on this message.
    #[serde(rename = "reveal.started")]
    RevealStarted {
        /// Message being revealed.
        id: MessageId,
    },

    /// The reveal on this message ended.
    #[serde(rename = "reveal.finished")]
    RevealFinished {
        /// Message that was revealed.
        id: MessageId,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Activity flags
    // ─────────────────────────────────────────────────────────────────────
    /// A chat request started or finished.
    #[serde(rename = "busy.changed")]
    BusyChanged {
        /// Whether a chat request is in flight.
        busy: bool,
    },

    /// An upload started or finished.
    #[serde(rename = "uploading.changed")]
    UploadingChanged {
        /// Whether an upload is in flight.
        uploading: bool,
    },

    /// Input focus should return to the composer.
    #[serde(rename = "composer.focus")]
    FocusComposer,

    // ─────────────────────────────────────────────────────────────────────
    // Session, document, health, notifications
    // ─────────────────────────────────────────────────────────────────────
    /// A new session id is in effect.
    #[serde(rename = "session.changed")]
    SessionChanged {
        /// Current id.
        session_id: String,
    },

    /// Document association changed.
    #[serde(rename = "document.changed")]
    DocumentChanged(DocumentAssociation),

    /// Health panel changed (opened, checking, new snapshot, closed).
    #[serde(rename = "health.changed")]
    HealthChanged(HealthPanel),

    /// The visible notification changed; `None` means it was cleared.
    #[serde(rename = "notification.changed")]
    NotificationChanged(Option<Notification>),
}
