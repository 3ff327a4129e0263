//! Session identifier lifecycle.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::store::KeyValueStore;

/// Storage key holding the current session id.
pub const SESSION_KEY: &str = "chat_session_id";

const SUFFIX_LEN: usize = 9;
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Mint a new identifier: `session_<unix millis>_<9 base36 chars>`.
///
/// Unique enough to keep concurrent profiles apart; not a secret.
pub fn generate_session_id() -> String {
    let mut entropy = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        suffix.push(char::from(ALPHABET[(entropy % 36) as usize]));
        entropy /= 36;
    }
    format!("session_{}_{suffix}", Utc::now().timestamp_millis())
}

/// Owns the current session id and keeps it persisted.
#[derive(Debug, Clone)]
pub struct SessionIdentity {
    store: Arc<dyn KeyValueStore>,
    current: String,
}

impl SessionIdentity {
    /// Resume the persisted id, or mint and persist a new one.
    ///
    /// Storage failures are logged; the process still gets a usable id.
    pub fn load_or_create(store: Arc<dyn KeyValueStore>) -> Self {
        let existing = match store.get(SESSION_KEY) {
            Ok(value) => value.filter(|id| !id.trim().is_empty()),
            Err(e) => {
                warn!(name: "session.load_failed", error = %e, "Could not read stored session id");
                None
            }
        };

        let current = if let Some(id) = existing {
            info!(name: "session.resumed", session_id = %id, "Resumed stored session");
            id
        } else {
            let id = generate_session_id();
            persist(store.as_ref(), &id);
            info!(name: "session.created", session_id = %id, "Created new session");
            id
        };

        Self { store, current }
    }

    /// The identifier every request must carry right now.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Replace the identifier with a fresh, persisted one. Returns the old id.
    pub fn rotate(&mut self) -> String {
        let next = generate_session_id();
        persist(self.store.as_ref(), &next);
        info!(name: "session.rotated", old = %self.current, new = %next, "Session rotated");
        std::mem::replace(&mut self.current, next)
    }
}

fn persist(store: &dyn KeyValueStore, id: &str) {
    if let Err(e) = store.set(SESSION_KEY, id) {
        warn!(name: "session.persist_failed", error = %e, "Could not persist session id");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    #[test]
    fn test_generated_id_shape() {
        let id = generate_session_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        );
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(generate_session_id(), generate_session_id());
    }

    #[test]
    fn test_reload_resumes_same_id() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let first = SessionIdentity::load_or_create(Arc::clone(&store));
        let second = SessionIdentity::load_or_create(Arc::clone(&store));
        assert_eq!(first.current(), second.current());
    }

    #[test]
    fn test_rotate_persists_new_id() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut identity = SessionIdentity::load_or_create(Arc::clone(&store));
        let before = identity.current().to_string();

        let old = identity.rotate();
        assert_eq!(old, before);
        assert_ne!(identity.current(), before);
        assert_eq!(
            store.get(SESSION_KEY).unwrap().as_deref(),
            Some(identity.current())
        );
    }

    #[test]
    fn test_blank_stored_id_is_replaced() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(SESSION_KEY, "  ").unwrap();
        let identity = SessionIdentity::load_or_create(Arc::clone(&store));
        assert!(identity.current().starts_with("session_"));
    }
}
