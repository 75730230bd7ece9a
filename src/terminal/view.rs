//! Plain-text rendering of controller updates.

use std::io::{self, Stdout, Write};
use std::sync::{Mutex, PoisonError};

use crate::controller::{Message, Role, UploadStatus, View};

/// Writes transcript and status updates as lines of text.
///
/// Terminals cannot take lines back, so hiding the typing indicator or the
/// follow-up offer prints nothing.
pub struct TerminalView<W> {
    out: Mutex<W>,
}

impl<W> std::fmt::Debug for TerminalView<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalView").finish_non_exhaustive()
    }
}

impl TerminalView<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Consume the view and return the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write + Send> View for TerminalView<W> {
    fn message_appended(&self, message: &Message) {
        let who = match message.role() {
            Role::User => "you",
            Role::Bot => "bot",
        };
        let stamp = message.sent_at().format("%H:%M:%S");
        self.line(&format!("[{stamp}] {who}: {}", message.text()));
    }

    fn typing_changed(&self, visible: bool) {
        if visible {
            self.line("bot is typing...");
        }
    }

    fn status_changed(&self, status: &UploadStatus) {
        let tag = match status {
            UploadStatus::Hidden => return,
            UploadStatus::InProgress(_) => "info",
            UploadStatus::Success(_) => "ok",
            UploadStatus::Error(_) => "error",
        };
        if let Some(text) = status.text() {
            self.line(&format!("[{tag}] {text}"));
        }
    }

    fn followup_changed(&self, followup: Option<&str>) {
        if let Some(text) = followup {
            self.line(&format!("suggested follow-up: {text} (type /followup to ask)"));
        }
    }

    fn input_cleared(&self) {}

    fn alert(&self, text: &str) {
        self.line(&format!("! {text}"));
    }
}
