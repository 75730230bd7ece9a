//! Chat controller: the state behind the upload form, the question form
//! and the follow-up button.
//!
//! The controller owns the transcript, the upload banner state and the
//! pending follow-up suggestion. Rendering and networking are injected as a
//! [`View`] and a [`Backend`], so any number of independent controllers can
//! run side by side.
//!
//! Handlers take `&self`; wrap the controller in an `Arc` to run flows
//! concurrently. A flow of the same kind as one already in flight is refused
//! with [`FlowOutcome::Busy`] instead of racing it.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use docchat::api::HttpBackend;
//! use docchat::controller::ChatController;
//! use docchat::terminal::TerminalView;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(HttpBackend::new("http://127.0.0.1:8080")?);
//! let view = Arc::new(TerminalView::stdout());
//! let controller = ChatController::new(backend, view);
//!
//! controller.submit_chat("What is the summary?").await;
//! # Ok(())
//! # }
//! ```

mod status;
mod transcript;
mod view;

pub use status::UploadStatus;
pub use transcript::{Entry, Message, Role, Transcript};
pub use view::View;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{Backend, ChatRequest};
use crate::document::UploadDocument;

/// Alert raised when the upload form is submitted without a file.
pub const NO_FILE_ALERT: &str = "Please select a PDF file";

/// Banner text while an upload is being processed.
pub const UPLOADING_TEXT: &str = "Uploading and processing PDF...";

/// Bot message appended after a successful upload.
pub const PDF_LOADED_MESSAGE: &str =
    "PDF loaded successfully. What would you like to know about this document?";

/// How a single handler invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Precondition not met; nothing changed and nothing was sent.
    Skipped,
    /// A request of the same kind was still outstanding.
    Busy,
    /// The backend answered successfully.
    Completed,
    /// The request failed; the failure was shown to the user.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowKind {
    Upload,
    Chat,
}

#[derive(Debug, Default)]
struct ControllerState {
    transcript: Transcript,
    upload_status: UploadStatus,
    pending_followup: Option<String>,
    upload_in_flight: bool,
    chat_in_flight: bool,
}

impl ControllerState {
    fn in_flight(&mut self, kind: FlowKind) -> &mut bool {
        match kind {
            FlowKind::Upload => &mut self.upload_in_flight,
            FlowKind::Chat => &mut self.chat_in_flight,
        }
    }
}

/// Drives the upload, chat and follow-up flows.
pub struct ChatController<B: ?Sized, V: ?Sized> {
    backend: Arc<B>,
    view: Arc<V>,
    state: Mutex<ControllerState>,
}

impl<B: ?Sized, V: ?Sized> std::fmt::Debug for ChatController<B, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<B, V> ChatController<B, V>
where
    B: Backend + ?Sized,
    V: View + ?Sized,
{
    pub fn new(backend: Arc<B>, view: Arc<V>) -> Self {
        Self {
            backend,
            view,
            state: Mutex::new(ControllerState::default()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Handlers
    // ─────────────────────────────────────────────────────────────────────────

    /// Upload form submitted. `None` means no file was selected.
    pub async fn submit_upload(&self, document: Option<UploadDocument>) -> FlowOutcome {
        let Some(document) = document else {
            debug!("Upload submitted without a file");
            self.view.alert(NO_FILE_ALERT);
            return FlowOutcome::Skipped;
        };

        let _in_flight = {
            let mut state = self.lock();
            let Some(guard) = self.try_begin(&mut state, FlowKind::Upload) else {
                return Self::busy(FlowKind::Upload);
            };
            self.set_status(&mut state, UploadStatus::InProgress(UPLOADING_TEXT.to_string()));
            guard
        };

        let request_id = Uuid::new_v4().to_string();
        info!(
            name: "upload.started",
            request_id = %request_id,
            file_name = %document.file_name,
            size = document.len(),
            "Uploading document"
        );

        let result = self.backend.upload_pdf(document).await;

        let mut state = self.lock();
        match result {
            Ok(response) => {
                info!(
                    name: "upload.completed",
                    request_id = %request_id,
                    filename = %response.filename,
                    "Document processed"
                );
                let text = format!(
                    "PDF \"{}\" processed successfully. You can now ask questions!",
                    response.filename
                );
                self.set_status(&mut state, UploadStatus::Success(text));
                self.append(&mut state, Message::bot(PDF_LOADED_MESSAGE));
                FlowOutcome::Completed
            }
            Err(e) => {
                warn!(
                    name: "upload.failed",
                    request_id = %request_id,
                    error = %e,
                    "Upload failed"
                );
                let text = if e.is_rejection() {
                    format!("Error processing PDF: {}", e.user_message())
                } else {
                    format!("Error: {}", e.user_message())
                };
                self.set_status(&mut state, UploadStatus::Error(text));
                FlowOutcome::Failed
            }
        }
    }

    /// Question form submitted with the raw input value.
    pub async fn submit_chat(&self, input: &str) -> FlowOutcome {
        let question = input.trim();
        if question.is_empty() {
            debug!("Ignoring empty question");
            return FlowOutcome::Skipped;
        }

        let _in_flight = {
            let mut state = self.lock();
            let Some(guard) = self.try_begin(&mut state, FlowKind::Chat) else {
                return Self::busy(FlowKind::Chat);
            };
            self.append(&mut state, Message::user(question));
            self.view.input_cleared();
            state.pending_followup = None;
            self.view.followup_changed(None);
            self.show_typing(&mut state);
            guard
        };

        self.exchange(ChatRequest::question(question)).await
    }

    /// Follow-up button pressed.
    pub async fn accept_followup(&self) -> FlowOutcome {
        let (followup, _in_flight) = {
            let mut state = self.lock();
            let Some(followup) = state.pending_followup.clone() else {
                debug!("No follow-up pending");
                return FlowOutcome::Skipped;
            };
            let Some(guard) = self.try_begin(&mut state, FlowKind::Chat) else {
                return Self::busy(FlowKind::Chat);
            };
            state.pending_followup = None;
            self.append(&mut state, Message::user(followup.as_str()));
            self.view.followup_changed(None);
            self.show_typing(&mut state);
            (followup, guard)
        };

        self.exchange(ChatRequest::followup(followup)).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot of the transcript, typing indicator included.
    pub fn transcript(&self) -> Transcript {
        self.lock().transcript.clone()
    }

    /// Snapshot of the messages, in order.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().transcript.messages().cloned().collect()
    }

    pub fn pending_followup(&self) -> Option<String> {
        self.lock().pending_followup.clone()
    }

    pub fn upload_status(&self) -> UploadStatus {
        self.lock().upload_status.clone()
    }

    pub fn is_chat_in_flight(&self) -> bool {
        self.lock().chat_in_flight
    }

    pub fn is_upload_in_flight(&self) -> bool {
        self.lock().upload_in_flight
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    async fn exchange(&self, request: ChatRequest) -> FlowOutcome {
        let request_id = Uuid::new_v4().to_string();
        info!(
            name: "chat.sent",
            request_id = %request_id,
            use_followup = request.use_followup,
            "Chat request sent"
        );

        let result = self.backend.chat(&request).await;

        let mut state = self.lock();
        if state.transcript.remove_typing() {
            self.view.typing_changed(false);
        }

        match result {
            Ok(response) => {
                let followup = response.suggested_followup().map(str::to_string);
                info!(
                    name: "chat.answered",
                    request_id = %request_id,
                    answer_length = response.answer.len(),
                    has_followup = followup.is_some(),
                    "Chat answer received"
                );
                self.append(&mut state, Message::bot(response.answer));
                if let Some(text) = &followup {
                    self.view.followup_changed(Some(text));
                }
                state.pending_followup = followup;
                FlowOutcome::Completed
            }
            Err(e) => {
                warn!(
                    name: "chat.failed",
                    request_id = %request_id,
                    error = %e,
                    "Chat request failed"
                );
                self.append(&mut state, Message::bot(format!("Error: {}", e.user_message())));
                FlowOutcome::Failed
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_begin(&self, state: &mut ControllerState, kind: FlowKind) -> Option<InFlight<'_, B, V>> {
        let flag = state.in_flight(kind);
        if *flag {
            return None;
        }
        *flag = true;
        Some(InFlight {
            controller: self,
            kind,
        })
    }

    fn busy(kind: FlowKind) -> FlowOutcome {
        match kind {
            FlowKind::Upload => info!(name: "upload.busy", "Upload already in flight, submission ignored"),
            FlowKind::Chat => info!(name: "chat.busy", "Chat already in flight, submission ignored"),
        }
        FlowOutcome::Busy
    }

    fn append(&self, state: &mut ControllerState, message: Message) {
        self.view.message_appended(&message);
        state.transcript.push(message);
    }

    fn show_typing(&self, state: &mut ControllerState) {
        if state.transcript.show_typing() {
            self.view.typing_changed(true);
        }
    }

    fn set_status(&self, state: &mut ControllerState, status: UploadStatus) {
        self.view.status_changed(&status);
        state.upload_status = status;
    }
}

/// Marks a flow kind as in flight until dropped.
///
/// Dropping a flow early (its future was cancelled) also undoes what it left
/// on screen: a chat takes the typing indicator down and an upload hides the
/// in-progress banner.
struct InFlight<'a, B, V>
where
    B: Backend + ?Sized,
    V: View + ?Sized,
{
    controller: &'a ChatController<B, V>,
    kind: FlowKind,
}

impl<B, V> Drop for InFlight<'_, B, V>
where
    B: Backend + ?Sized,
    V: View + ?Sized,
{
    fn drop(&mut self) {
        let mut state = self.controller.lock();
        *state.in_flight(self.kind) = false;
        match self.kind {
            FlowKind::Chat => {
                if state.transcript.remove_typing() {
                    self.controller.view.typing_changed(false);
                }
            }
            FlowKind::Upload => {
                if matches!(state.upload_status, UploadStatus::InProgress(_)) {
                    self.controller.set_status(&mut state, UploadStatus::Hidden);
                }
            }
        }
    }
}
