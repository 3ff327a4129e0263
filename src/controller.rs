//! Session/chat controller.
//!
//! [`ChatController`] owns every piece of mutable client state and exposes
//! it only through operations: submit a message, upload or remove the
//! session document, check backend health, clear the chat. Renderers read
//! [`ControllerState`] snapshots and listen to [`ControllerEvent`]s.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use docchat::api::HttpBackend;
//! use docchat::controller::{ChatController, ControllerOptions};
//! use docchat::session::MemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(HttpBackend::new("http://localhost:8000")?);
//! let controller = ChatController::new(backend, Arc::new(MemoryStore::new()), ControllerOptions::default());
//! controller.start().await;
//!
//! controller.submit("What is in my document?").await;
//! for message in controller.snapshot().messages {
//!     println!("{:?}: {}", message.role, message.content);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{ChatBackend, UploadFile};
use crate::chat::{Message, MessageId, RevealEnd, RevealSchedule, Role, run_reveal};
use crate::document::{DocumentAssociation, UNSUPPORTED_FILE_MESSAGE, is_allowed_file};
use crate::events::ControllerEvent;
use crate::health::{HealthPanel, HealthSnapshot};
use crate::notify::{DEFAULT_NOTIFICATION_TTL, Notification, Notifier};
use crate::session::{KeyValueStore, SessionIdentity};

/// Capacity of the event channel. Slow renderers see `Lagged` and resync
/// from a snapshot.
const EVENT_CAPACITY: usize = 1024;

const EMPTY_MESSAGE: &str = "Type a message first.";
const CHAT_FALLBACK: &str = "Failed to get response";
const UPLOAD_FALLBACK: &str = "Upload failed";
const REMOVE_FALLBACK: &str = "Failed to clear document";
const CLEARED_MESSAGE: &str = "Chat cleared. Starting new session.";
const REMOVED_MESSAGE: &str = "Document removed";

/// Tunables for a controller.
#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    /// Pace of the reply reveal.
    pub reveal: RevealSchedule,
    /// How long a notification stays visible.
    pub notification_ttl: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            reveal: RevealSchedule::default(),
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }
}

/// Read-only copy of everything a renderer needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ControllerState {
    /// Identifier every request is currently issued under.
    pub session_id: String,
    /// Conversation in display order.
    pub messages: Vec<Message>,
    /// A chat request is in flight; the send control is disabled.
    pub busy: bool,
    /// An upload is in flight; the upload control is disabled.
    pub uploading: bool,
    /// Message currently being revealed, if any.
    pub revealing: Option<MessageId>,
    /// Backend-held document association, as last known.
    pub document: DocumentAssociation,
    /// Health panel.
    pub health: HealthPanel,
    /// Visible notification.
    pub notification: Option<Notification>,
}

/// Result of [`ChatController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to send after trimming.
    Rejected,
    /// Another submission is in flight; nothing happened.
    Busy,
    /// The reply was received and fully revealed in this message.
    Replied(MessageId),
    /// The request failed; this message carries the error annotation.
    Failed(MessageId),
    /// The controller was shut down while waiting.
    Cancelled,
}

/// Result of an upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// File type not accepted; the backend was not contacted.
    Rejected,
    /// Another upload is in flight.
    Busy,
    /// The backend accepted the document.
    Uploaded,
    /// The file could not be read or the backend refused it.
    Failed,
}

#[derive(Debug)]
struct Shared {
    identity: SessionIdentity,
    messages: Vec<Message>,
    busy: bool,
    uploading: bool,
    revealing: Option<MessageId>,
    document: DocumentAssociation,
    health: HealthPanel,
}

struct Inner {
    backend: Arc<dyn ChatBackend>,
    state: RwLock<Shared>,
    notifier: Notifier,
    events: broadcast::Sender<ControllerEvent>,
    reveal: RevealSchedule,
    shutdown: CancellationToken,
}

#[allow(clippy::missing_fields_in_debug)]
impl std::fmt::Debug for Inner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inner")
            .field("backend", &"ChatBackend")
            .field("state", &self.state)
            .field("reveal", &self.reveal)
            .finish()
    }
}

/// The session/chat controller. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct ChatController {
    inner: Arc<Inner>,
}

impl ChatController {
    /// Create a controller, resuming (or minting) the persisted session id.
    ///
    /// Nothing is fetched yet; call [`ChatController::start`] for that.
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        store: Arc<dyn KeyValueStore>,
        options: ControllerOptions,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shutdown = CancellationToken::new();
        let notifier = Notifier::new(options.notification_ttl, events.clone(), shutdown.clone());
        let identity = SessionIdentity::load_or_create(store);

        Self {
            inner: Arc::new(Inner {
                backend,
                state: RwLock::new(Shared {
                    identity,
                    messages: Vec::new(),
                    busy: false,
                    uploading: false,
                    revealing: None,
                    document: DocumentAssociation::default(),
                    health: HealthPanel::default(),
                }),
                notifier,
                events,
                reveal: options.reveal,
                shutdown,
            }),
        }
    }

    /// Load backend-side context for the current session: document status
    /// and stored history. Never fails.
    pub async fn start(&self) {
        self.refresh_session_context().await;
    }

    /// Subscribe to state-change events.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.inner.events.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ControllerState {
        let state = self.read();
        ControllerState {
            session_id: state.identity.current().to_string(),
            messages: state.messages.clone(),
            busy: state.busy,
            uploading: state.uploading,
            revealing: state.revealing.clone(),
            document: state.document.clone(),
            health: state.health.clone(),
            notification: self.inner.notifier.current(),
        }
    }

    /// Identifier requests are issued under right now.
    pub fn session_id(&self) -> String {
        self.read().identity.current().to_string()
    }

    /// Tear the controller down. Pending reveal steps and notification
    /// timers become no-ops.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
    }

    /// Whether [`ChatController::shutdown`] was called.
    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chat turns
    // ─────────────────────────────────────────────────────────────────────────

    /// Send one message and reveal the reply.
    ///
    /// The user message is appended before the request goes out. On success
    /// an empty assistant message is appended, the busy flag drops, and the
    /// reply is revealed into that message; the call returns once the reveal
    /// is done. On failure a single assistant message carries the error.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            self.inner.notifier.error(EMPTY_MESSAGE);
            self.emit(ControllerEvent::FocusComposer);
            return SubmitOutcome::Rejected;
        }

        let (session_id, user_message) = {
            let mut state = self.write();
            if state.busy {
                return SubmitOutcome::Busy;
            }
            state.busy = true;
            let message = Message::user(text);
            state.messages.push(message.clone());
            (state.identity.current().to_string(), message)
        };
        self.emit(ControllerEvent::MessageAppended(user_message));
        self.emit(ControllerEvent::BusyChanged { busy: true });

        info!(
            name: "chat.request.sent",
            session_id = %session_id,
            chars = text.chars().count(),
            "Chat request sent"
        );
        let result = self.inner.backend.chat(text, &session_id).await;
        if self.is_shut_down() {
            return SubmitOutcome::Cancelled;
        }

        let outcome = match result {
            Ok(reply) => {
                info!(
                    name: "chat.reply.received",
                    session_id = %session_id,
                    chars = reply.response.chars().count(),
                    "Chat reply received"
                );
                let id = self.append_assistant(String::new());
                self.reveal(&id, &reply.response).await;
                SubmitOutcome::Replied(id)
            }
            Err(e) => {
                warn!(name: "chat.request.failed", session_id = %session_id, error = %e, "Chat request failed");
                let id = self.append_assistant(format!("⚠️ {}", e.user_message(CHAT_FALLBACK)));
                SubmitOutcome::Failed(id)
            }
        };

        self.emit(ControllerEvent::FocusComposer);
        outcome
    }

    /// Append an assistant message and clear the busy flag in one step.
    fn append_assistant(&self, content: String) -> MessageId {
        let message = Message::assistant(content);
        let id = message.id.clone();
        {
            let mut state = self.write();
            state.messages.push(message.clone());
            state.busy = false;
        }
        self.emit(ControllerEvent::MessageAppended(message));
        self.emit(ControllerEvent::BusyChanged { busy: false });
        id
    }

    /// Reveal `text` into message `id`, one token per step.
    ///
    /// A newer reveal supersedes this one: the message then jumps to its full
    /// text and the loop stops. A message that vanished (chat cleared) ends
    /// the loop quietly.
    async fn reveal(&self, id: &MessageId, text: &str) {
        self.write().revealing = Some(id.clone());
        self.emit(ControllerEvent::RevealStarted { id: id.clone() });

        let end = run_reveal(text, self.inner.reveal, &self.inner.shutdown, |prefix| {
            let mut state = self.write();
            let superseded = state.revealing.as_ref() != Some(id);
            let Some(message) = state.messages.iter_mut().find(|m| m.id == *id) else {
                return false;
            };
            let content = if superseded { text } else { prefix };
            message.content = content.to_string();
            drop(state);

            self.emit(ControllerEvent::MessageUpdated {
                id: id.clone(),
                content: content.to_string(),
            });
            !superseded
        })
        .await;

        if end == RevealEnd::Cancelled {
            debug!(name: "chat.reveal.cancelled", message_id = %id, "Reveal cancelled by shutdown");
            return;
        }

        let mut state = self.write();
        if state.revealing.as_ref() == Some(id) {
            state.revealing = None;
        }
        drop(state);
        self.emit(ControllerEvent::RevealFinished { id: id.clone() });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Start over: drop the local conversation, delete the backend session
    /// (best effort), and switch to a freshly minted, persisted identifier.
    pub async fn clear_chat(&self) {
        let old = {
            let mut state = self.write();
            state.messages.clear();
            state.identity.current().to_string()
        };
        self.emit(ControllerEvent::MessagesReset {
            messages: Vec::new(),
        });

        if let Err(e) = self.inner.backend.delete_session(&old).await {
            debug!(name: "session.delete.ignored", session_id = %old, error = %e, "Session delete failed");
        }

        let new = {
            let mut state = self.write();
            state.identity.rotate();
            state.document = DocumentAssociation::default();
            state.identity.current().to_string()
        };
        self.emit(ControllerEvent::SessionChanged { session_id: new });
        self.emit(ControllerEvent::DocumentChanged(DocumentAssociation::default()));
        self.inner.notifier.success(CLEARED_MESSAGE);

        self.refresh_session_context().await;
    }

    async fn refresh_session_context(&self) {
        self.check_document_status().await;
        self.load_history().await;
    }

    /// Fetch the document association for the current session.
    ///
    /// Background call: failures leave local state untouched and are only
    /// logged. A reply for a session that is no longer current is dropped.
    pub async fn check_document_status(&self) {
        let session_id = self.session_id();
        match self.inner.backend.document_status(&session_id).await {
            Ok(status) => {
                let document = DocumentAssociation::from(status);
                {
                    let mut state = self.write();
                    if state.identity.current() != session_id {
                        return;
                    }
                    state.document = document.clone();
                }
                self.emit(ControllerEvent::DocumentChanged(document));
            }
            Err(e) => {
                debug!(name: "document.status.unavailable", session_id = %session_id, error = %e, "Document status unavailable");
            }
        }
    }

    /// Restore the stored conversation for the current session.
    ///
    /// Background call: failures are only logged. An empty history leaves
    /// the local list alone. Restored messages get ids `loaded_<n>` and the
    /// current time as timestamp.
    pub async fn load_history(&self) {
        let session_id = self.session_id();
        let entries = match self.inner.backend.history(&session_id).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!(name: "history.unavailable", session_id = %session_id, error = %e, "History unavailable");
                return;
            }
        };
        if entries.is_empty() {
            return;
        }

        let messages: Vec<Message> = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| Message {
                id: MessageId::loaded(index),
                role: Role::from_wire(&entry.role),
                content: entry.content,
                timestamp: chrono::Utc::now(),
            })
            .collect();

        {
            let mut state = self.write();
            if state.identity.current() != session_id {
                return;
            }
            state.messages.clone_from(&messages);
        }
        info!(name: "history.loaded", session_id = %session_id, count = messages.len(), "History loaded");
        self.emit(ControllerEvent::MessagesReset { messages });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Documents
    // ─────────────────────────────────────────────────────────────────────────

    /// Upload a document read from disk.
    ///
    /// The extension gate runs before the file is even opened.
    pub async fn upload_path(&self, path: impl AsRef<Path>) -> UploadOutcome {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_allowed_file(&name) {
            self.inner.notifier.error(UNSUPPORTED_FILE_MESSAGE);
            return UploadOutcome::Rejected;
        }

        match tokio::fs::read(path).await {
            Ok(bytes) => self.upload(UploadFile::new(name, bytes)).await,
            Err(e) => {
                warn!(name: "document.read_failed", path = %path.display(), error = %e, "Could not read file");
                self.inner
                    .notifier
                    .error(format!("Could not read \"{name}\": {e}"));
                UploadOutcome::Failed
            }
        }
    }

    /// Upload a document for the current session.
    pub async fn upload(&self, file: UploadFile) -> UploadOutcome {
        if !is_allowed_file(&file.name) {
            self.inner.notifier.error(UNSUPPORTED_FILE_MESSAGE);
            return UploadOutcome::Rejected;
        }

        let session_id = {
            let mut state = self.write();
            if state.uploading {
                return UploadOutcome::Busy;
            }
            state.uploading = true;
            state.identity.current().to_string()
        };
        self.emit(ControllerEvent::UploadingChanged { uploading: true });

        let name = file.name.clone();
        info!(name: "document.upload.started", session_id = %session_id, file = %name, bytes = file.bytes.len(), "Uploading document");
        let result = self.inner.backend.upload(&session_id, file).await;

        let outcome = match result {
            Ok(()) => {
                let document = DocumentAssociation::attached(name.clone());
                let current = {
                    let mut state = self.write();
                    let current = state.identity.current() == session_id;
                    if current {
                        state.document = document.clone();
                    }
                    current
                };
                if current {
                    self.emit(ControllerEvent::DocumentChanged(document));
                    self.inner
                        .notifier
                        .success(format!("\"{name}\" uploaded successfully!"));
                } else {
                    debug!(name: "document.upload.stale", session_id = %session_id, file = %name, "Upload finished for a rotated session");
                }
                UploadOutcome::Uploaded
            }
            Err(e) => {
                warn!(name: "document.upload.failed", session_id = %session_id, error = %e, "Upload failed");
                self.inner.notifier.error(e.user_message(UPLOAD_FALLBACK));
                UploadOutcome::Failed
            }
        };

        self.write().uploading = false;
        self.emit(ControllerEvent::UploadingChanged { uploading: false });
        outcome
    }

    /// Remove the session's document. Local state only changes once the
    /// backend confirms. Returns whether the document was removed.
    pub async fn remove_document(&self) -> bool {
        let session_id = self.session_id();
        match self.inner.backend.delete_document(&session_id).await {
            Ok(()) => {
                self.write().document = DocumentAssociation::default();
                self.emit(ControllerEvent::DocumentChanged(DocumentAssociation::default()));
                self.inner.notifier.success(REMOVED_MESSAGE);
                true
            }
            Err(e) => {
                warn!(name: "document.remove.failed", session_id = %session_id, error = %e, "Document removal failed");
                self.inner.notifier.error(e.user_message(REMOVE_FALLBACK));
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Health
    // ─────────────────────────────────────────────────────────────────────────

    /// Open the health panel in its checking state and fetch a snapshot.
    pub async fn check_health(&self) -> HealthSnapshot {
        let panel = {
            let mut state = self.write();
            state.health.open = true;
            state.health.checking = true;
            state.health.clone()
        };
        self.emit(ControllerEvent::HealthChanged(panel));

        let snapshot = HealthSnapshot::from_result(self.inner.backend.health().await);
        info!(
            name: "health.checked",
            overall = %snapshot.overall,
            backend = %snapshot.backend,
            "Health checked"
        );

        let panel = {
            let mut state = self.write();
            state.health.checking = false;
            state.health.snapshot = Some(snapshot.clone());
            state.health.clone()
        };
        self.emit(ControllerEvent::HealthChanged(panel));
        snapshot
    }

    /// Re-run the health check while keeping the panel open.
    pub async fn refresh_health(&self) -> HealthSnapshot {
        self.check_health().await
    }

    /// Close the health panel. The last snapshot is kept.
    pub fn close_health(&self) {
        let panel = {
            let mut state = self.write();
            state.health.open = false;
            state.health.clone()
        };
        self.emit(ControllerEvent::HealthChanged(panel));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────────

    /// Hide the visible notification now.
    pub fn dismiss_notification(&self) {
        self.inner.notifier.dismiss();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn read(&self) -> RwLockReadGuard<'_, Shared> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Shared> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ControllerEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }
}
