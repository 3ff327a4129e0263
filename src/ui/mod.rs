//! Terminal views.
//!
//! Pure renderers of controller state: nothing here mutates the controller.
//!
//! # Structure
//!
//! - [`chat`]: header, message list, composer
//! - [`health_panel`]: health check panel
//! - [`toast`]: notification line
//! - [`terminal`]: event-driven renderer tying the views together

pub mod chat;
pub mod health_panel;
pub mod terminal;
pub mod toast;
