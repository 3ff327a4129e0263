//! Header line: session, document badge, message count.

use colored::Colorize;

use crate::controller::ControllerState;

/// One-line header for the current state.
pub fn render_header(state: &ControllerState) -> String {
    let document = match (state.document.has_document, &state.document.name) {
        (true, Some(name)) => format!("📄 {name}").green().to_string(),
        (true, None) => "📄 document attached".green().to_string(),
        (false, _) => "no document".dimmed().to_string(),
    };

    let mut parts = vec![
        "docchat".bold().to_string(),
        document,
        format!("{} messages", state.messages.len()),
    ];
    if state.uploading {
        parts.push("uploading…".yellow().to_string());
    }
    parts.push(format!("session {}", state.session_id).dimmed().to_string());
    parts.join(" · ")
}
