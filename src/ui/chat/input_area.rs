//! Composer: line input and slash commands.

use std::path::PathBuf;

use super::message_list::SUGGESTIONS;

/// Command reference printed by `/help`.
pub const HELP_TEXT: &str = "\
Type a message and press Enter to send. End a line with \\ to continue it.
  /upload <path>   attach a PDF, CSV or TXT document
  /remove          remove the attached document
  /clear           clear the chat and start a new session
  /health          check backend health
  /refresh         re-run the health check
  /close           close the health panel
  /dismiss         hide the notification
  /suggest <n>     send suggestion n as your message
  /help            show this help
  /quit            exit";

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text to submit.
    Send(String),
    /// Upload the file at this path.
    Upload(PathBuf),
    /// Remove the session document.
    RemoveDocument,
    /// Clear chat, rotate session.
    Clear,
    /// Open the health panel and check.
    Health,
    /// Re-check health.
    Refresh,
    /// Close the health panel.
    Close,
    /// Hide the notification.
    Dismiss,
    /// Show help.
    Help,
    /// Exit.
    Quit,
    /// Input the composer could not make sense of, with a reason.
    Invalid(String),
}

/// Turn one complete composer entry into a command.
pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Send(input.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "upload" if arg.is_empty() => Command::Invalid("usage: /upload <path>".into()),
        "upload" => Command::Upload(PathBuf::from(arg)),
        "remove" => Command::RemoveDocument,
        "clear" => Command::Clear,
        "health" => Command::Health,
        "refresh" => Command::Refresh,
        "close" => Command::Close,
        "dismiss" => Command::Dismiss,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "suggest" => match arg.parse::<usize>() {
            Ok(n) if (1..=SUGGESTIONS.len()).contains(&n) => {
                Command::Send(SUGGESTIONS[n - 1].to_string())
            }
            _ => Command::Invalid(format!("usage: /suggest <1-{}>", SUGGESTIONS.len())),
        },
        other => Command::Invalid(format!("unknown command /{other}, try /help")),
    }
}

/// Collects continued lines into one entry.
#[derive(Debug, Default)]
pub struct Composer {
    pending: Vec<String>,
}

impl Composer {
    /// Feed one terminal line. Returns the finished entry, or `None` while a
    /// trailing backslash asks for more.
    pub fn push_line(&mut self, line: &str) -> Option<String> {
        if let Some(head) = line.strip_suffix('\\') {
            self.pending.push(head.to_string());
            return None;
        }
        self.pending.push(line.to_string());
        Some(std::mem::take(&mut self.pending).join("\n"))
    }

    /// Whether a continued entry is in progress.
    pub fn is_continuing(&self) -> bool {
        !self.pending.is_empty()
    }
}
