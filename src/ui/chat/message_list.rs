//! Message list rendering.

use chrono::Local;
use colored::Colorize;

use crate::chat::{Message, Role};

/// Prompts offered on an empty conversation.
pub const SUGGESTIONS: [&str; 4] = [
    "Explain quantum computing",
    "Help me write a poem",
    "What's the weather like?",
    "Summarize this document",
];

/// Empty-state greeting with numbered suggestions.
pub fn render_welcome() -> String {
    let mut out = format!(
        "{}\nAsk me anything or upload a PDF/CSV file to chat about its contents.\n",
        "How can I help you today?".bold()
    );
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        out.push_str(&format!("  /suggest {} → {suggestion}\n", i + 1));
    }
    out
}

/// Prefix printed before a message's content: time and author.
fn label(message: &Message) -> String {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    let who = match message.role {
        Role::User => "you".cyan().bold(),
        Role::Assistant => "assistant".magenta().bold(),
    };
    format!("[{time}] {who}: ")
}

/// A full message line. `revealing` appends a cursor marker.
pub fn render_message(message: &Message, revealing: bool) -> String {
    let cursor = if revealing { "▌" } else { "" };
    format!("{}{}{cursor}", label(message), message.content)
}

/// Indicator shown while a reply is awaited.
pub fn render_thinking() -> String {
    "assistant is thinking…".dimmed().italic().to_string()
}
