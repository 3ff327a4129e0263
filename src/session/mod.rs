//! Session identity and client-side persistence.
//!
//! A session id correlates every request of one profile with one
//! backend-side conversation and document. It is kept in a tiny key-value
//! store so restarting the client resumes the same conversation.
//!
//! # Architecture
//!
//! - [`KeyValueStore`]: persistence seam, with [`FileStore`] and [`MemoryStore`]
//! - [`SessionIdentity`]: owns the current id and rotates it on "clear chat"
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use docchat::session::{MemoryStore, SessionIdentity};
//!
//! let store = Arc::new(MemoryStore::new());
//! let mut identity = SessionIdentity::load_or_create(store.clone());
//! let old = identity.rotate();
//! assert_ne!(old, identity.current());
//! ```

mod identity;
mod store;

pub use identity::{SESSION_KEY, SessionIdentity, generate_session_id};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
