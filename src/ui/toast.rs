//! Notification line.

use colored::Colorize;

use crate::notify::{Notification, NotificationKind};

/// Render the visible notification.
pub fn render_notification(notification: &Notification) -> String {
    match notification.kind {
        NotificationKind::Success => format!("✓ {}", notification.message).green().to_string(),
        NotificationKind::Error => format!("✗ {}", notification.message).red().to_string(),
    }
}
