//! Event-driven terminal renderer.
//!
//! Applies [`ControllerEvent`]s to an output stream. Reveal steps are printed
//! as deltas so a reply appears to type itself out on one line.

use std::collections::{HashMap, HashSet};
use std::io::{self, Write};

use crate::chat::{Message, MessageId, Role};
use crate::controller::ControllerState;
use crate::events::ControllerEvent;

use super::chat::{render_header, render_message, render_thinking, render_welcome};
use super::health_panel::render_health_panel;
use super::toast::render_notification;

/// Prompt shown when the composer has focus.
pub const PROMPT: &str = "> ";

/// Writes controller events to a terminal-like sink.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: W,
    /// Bytes already printed for messages being revealed.
    printed: HashMap<MessageId, usize>,
    /// Reveals whose line was closed by a newer one.
    detached: HashSet<MessageId>,
}

impl<W: Write> TerminalRenderer<W> {
    /// Create a renderer writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: HashMap::new(),
            detached: HashSet::new(),
        }
    }

    /// Consume the renderer, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Full redraw from a snapshot (startup, or after falling behind).
    pub fn redraw(&mut self, state: &ControllerState) -> io::Result<()> {
        self.printed.clear();
        writeln!(self.out, "{}", render_header(state))?;
        if state.messages.is_empty() {
            writeln!(self.out, "{}", render_welcome())?;
        }
        for message in &state.messages {
            let revealing = state.revealing.as_ref() == Some(&message.id);
            writeln!(self.out, "{}", render_message(message, revealing))?;
        }
        if state.busy {
            writeln!(self.out, "{}", render_thinking())?;
        }
        if let Some(panel) = render_health_panel(&state.health) {
            writeln!(self.out, "{panel}")?;
        }
        if let Some(notification) = &state.notification {
            writeln!(self.out, "{}", render_notification(notification))?;
        }
        self.out.flush()
    }

    /// Print a superseded reply in full above the open reveal line, then
    /// restore that line.
    fn print_detached(
        &mut self,
        id: &MessageId,
        content: &str,
        state: &ControllerState,
    ) -> io::Result<()> {
        let find = |id: &MessageId| state.messages.iter().find(|m| m.id == *id);
        let Some(message) = find(id) else {
            return Ok(());
        };
        if !self.printed.is_empty() {
            writeln!(self.out)?;
        }
        let full = Message {
            content: content.to_string(),
            ..message.clone()
        };
        writeln!(self.out, "{}", render_message(&full, false))?;

        for (open_id, shown) in &self.printed {
            if let Some(open) = find(open_id) {
                let partial = Message {
                    content: open.content.get(..*shown).unwrap_or(&open.content).to_string(),
                    ..open.clone()
                };
                write!(self.out, "{}", render_message(&partial, false))?;
            }
        }
        Ok(())
    }

    /// Apply one event. `state` is a snapshot taken after the event.
    pub fn apply(&mut self, event: &ControllerEvent, state: &ControllerState) -> io::Result<()> {
        match event {
            // The user's own line is already on screen.
            ControllerEvent::MessageAppended(message) if message.role == Role::User => {}
            ControllerEvent::MessageAppended(message) if message.content.is_empty() => {
                // Only one reveal owns the open line.
                for (id, _) in self.printed.drain() {
                    writeln!(self.out)?;
                    self.detached.insert(id);
                }
                let line = render_message(message, false);
                write!(self.out, "{line}")?;
                self.printed.insert(message.id.clone(), 0);
            }
            ControllerEvent::MessageAppended(message) => {
                writeln!(self.out, "{}", render_message(message, false))?;
            }
            ControllerEvent::MessageUpdated { id, content } => {
                if let Some(printed) = self.printed.get_mut(id) {
                    let delta = content.get(*printed..).unwrap_or(content);
                    write!(self.out, "{delta}")?;
                    *printed = content.len();
                } else if self.detached.contains(id) {
                    self.print_detached(id, content, state)?;
                }
            }
            ControllerEvent::RevealFinished { id } => {
                self.detached.remove(id);
                if self.printed.remove(id).is_some() {
                    writeln!(self.out)?;
                }
            }
            ControllerEvent::MessagesReset { messages } => {
                self.printed.clear();
                self.detached.clear();
                if messages.is_empty() {
                    writeln!(self.out, "{}", render_welcome())?;
                } else {
                    for message in messages {
                        writeln!(self.out, "{}", render_message(message, false))?;
                    }
                }
            }
            ControllerEvent::BusyChanged { busy: true } => {
                writeln!(self.out, "{}", render_thinking())?;
            }
            ControllerEvent::SessionChanged { .. } | ControllerEvent::DocumentChanged(_) => {
                writeln!(self.out, "{}", render_header(state))?;
            }
            ControllerEvent::UploadingChanged { uploading: true } => {
                writeln!(self.out, "{}", render_header(state))?;
            }
            ControllerEvent::HealthChanged(panel) => {
                if let Some(rendered) = render_health_panel(panel) {
                    writeln!(self.out, "{rendered}")?;
                }
            }
            ControllerEvent::NotificationChanged(Some(notification)) => {
                writeln!(self.out, "{}", render_notification(notification))?;
            }
            ControllerEvent::FocusComposer => {
                write!(self.out, "{PROMPT}")?;
            }
            ControllerEvent::RevealStarted { .. }
            | ControllerEvent::BusyChanged { busy: false }
            | ControllerEvent::UploadingChanged { uploading: false }
            | ControllerEvent::NotificationChanged(None) => {}
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_reveal_prints_deltas_on_one_line() {
        let state = ControllerState::default();
        let mut r = TerminalRenderer::new(Vec::new());
        let message = Message::assistant("");
        let id = message.id.clone();

        r.apply(&ControllerEvent::MessageAppended(message), &state).unwrap();
        for content in ["Hi", "Hi there", "Hi there friend"] {
            r.apply(
                &ControllerEvent::MessageUpdated {
                    id: id.clone(),
                    content: content.into(),
                },
                &state,
            )
            .unwrap();
        }
        r.apply(&ControllerEvent::RevealFinished { id }, &state).unwrap();

        let out = text(r);
        assert!(out.ends_with("Hi there friend\n"));
        assert_eq!(out.matches("Hi").count(), 1);
    }

    #[test]
    fn test_newer_reveal_takes_over_the_line() {
        let older = Message::assistant("");
        let newer = Message::assistant("");
        let (a, b) = (older.id.clone(), newer.id.clone());
        let update = |id: &MessageId, content: &str| ControllerEvent::MessageUpdated {
            id: id.clone(),
            content: content.into(),
        };
        let mut state = ControllerState::default();
        let mut r = TerminalRenderer::new(Vec::new());

        r.apply(&ControllerEvent::MessageAppended(older.clone()), &state).unwrap();
        r.apply(&update(&a, "Hi"), &state).unwrap();
        r.apply(&ControllerEvent::MessageAppended(newer.clone()), &state).unwrap();
        r.apply(&update(&b, "One"), &state).unwrap();

        // The superseded reply jumps to its full text on a line of its own.
        state.messages.push(Message {
            content: "Hi there friend".into(),
            ..older
        });
        state.messages.push(Message {
            content: "One".into(),
            ..newer
        });
        r.apply(&update(&a, "Hi there friend"), &state).unwrap();
        r.apply(&ControllerEvent::RevealFinished { id: a }, &state).unwrap();
        r.apply(&update(&b, "One two"), &state).unwrap();
        r.apply(&ControllerEvent::RevealFinished { id: b }, &state).unwrap();

        let out = text(r);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("Hi"));
        assert!(lines[1].ends_with("One"));
        assert!(lines[2].ends_with("Hi there friend"));
        assert!(lines[3].ends_with("One two"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_user_messages_are_not_echoed() {
        let state = ControllerState::default();
        let mut r = TerminalRenderer::new(Vec::new());
        r.apply(&ControllerEvent::MessageAppended(Message::user("Hello")), &state)
            .unwrap();
        assert!(text(r).is_empty());
    }

    #[test]
    fn test_updates_for_unknown_messages_are_ignored() {
        let state = ControllerState::default();
        let mut r = TerminalRenderer::new(Vec::new());
        r.apply(
            &ControllerEvent::MessageUpdated {
                id: MessageId::loaded(0),
                content: "stale".into(),
            },
            &state,
        )
        .unwrap();
        assert!(text(r).is_empty());
    }

    #[test]
    fn test_redraw_empty_state_shows_welcome() {
        let mut r = TerminalRenderer::new(Vec::new());
        r.redraw(&ControllerState::default()).unwrap();
        assert!(text(r).contains("How can I help you today?"));
    }
}
