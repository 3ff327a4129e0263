//! docchat
//!
//! Client for a document-aware chat backend: a session/chat controller that
//! owns all client state and talks to the backend over HTTP/JSON, plus
//! terminal views that render it.
//!
//! # Architecture
//!
//! - **Controller**: one state object, mutated only through operations
//! - **Backend**: [`api::ChatBackend`] trait with a `reqwest` implementation
//! - **Session**: persisted session id, rotated on "clear chat"
//! - **UI**: terminal renderers driven by [`events::ControllerEvent`]s
//!
//! # Modules
//!
//! - [`api`]: backend trait, HTTP client, wire types
//! - [`chat`]: messages and the word-by-word reveal
//! - [`config`]: layered configuration
//! - [`controller`]: the session/chat controller
//! - [`document`]: document association and the upload gate
//! - [`events`]: controller events
//! - [`health`]: health snapshots
//! - [`notify`]: single-slot notifications
//! - [`session`]: session identity and persistence
//! - [`ui`]: terminal views

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

pub mod api;
pub mod chat;
pub mod config;
pub mod controller;
pub mod document;
pub mod events;
pub mod health;
pub mod notify;
pub mod session;
pub mod ui;

pub use controller::{ChatController, ControllerOptions, ControllerState};
