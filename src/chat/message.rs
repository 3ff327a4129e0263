//! Conversation messages as the client displays them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique id of a displayed message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Fresh random id for a message created locally.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Synthetic id for the `index`-th message restored from history.
    pub fn loaded(index: usize) -> Self {
        Self(format!("loaded_{index}"))
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the user.
    User,
    /// Produced by the backend, or a local error annotation.
    Assistant,
}

impl Role {
    /// Map a backend role string. Anything but `user` is shown as assistant.
    pub fn from_wire(role: &str) -> Self {
        if role.eq_ignore_ascii_case("user") {
            Self::User
        } else {
            Self::Assistant
        }
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique id.
    pub id: MessageId,
    /// Author.
    pub role: Role,
    /// Text. Assistant replies grow while being revealed.
    pub content: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// An assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_wire() {
        assert_eq!(Role::from_wire("user"), Role::User);
        assert_eq!(Role::from_wire("USER"), Role::User);
        assert_eq!(Role::from_wire("assistant"), Role::Assistant);
        assert_eq!(Role::from_wire("system"), Role::Assistant);
    }

    #[test]
    fn test_loaded_ids_are_sequential() {
        assert_eq!(MessageId::loaded(0).as_str(), "loaded_0");
        assert_eq!(MessageId::loaded(7).to_string(), "loaded_7");
    }

    #[test]
    fn test_local_ids_are_unique() {
        assert_ne!(Message::user("a").id, Message::user("a").id);
    }
}
