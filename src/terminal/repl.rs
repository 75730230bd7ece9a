//! Line-oriented input loop that turns typed commands into controller events.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::{JoinError, JoinSet};

use crate::api::Backend;
use crate::controller::{ChatController, FlowOutcome, View};
use crate::document::UploadDocument;

/// Printed ahead of a refused question or follow-up.
pub const CHAT_BUSY_NOTICE: &str = "Still waiting for the previous answer";

/// Printed ahead of a refused upload.
pub const UPLOAD_BUSY_NOTICE: &str = "Still processing the previous upload";

pub const HELP: &str = "\
Commands:
  /upload <file.pdf>   upload a document
  /followup, /f        ask the suggested follow-up question
  /help                show this help
  /quit, /exit         leave
Anything else is sent as a question.";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Upload form submitted; `None` when no file was given.
    Upload(Option<PathBuf>),
    AcceptFollowup,
    /// Question form submitted with the raw line.
    Ask(String),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Ask(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name {
            "upload" | "u" => Self::Upload((!arg.is_empty()).then(|| PathBuf::from(arg))),
            "followup" | "f" => Self::AcceptFollowup,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Read commands from `input` until `/quit` or end of input.
///
/// Each flow runs as its own task so a slow backend never blocks typing.
/// Outstanding flows are awaited before returning. Help text, local
/// problems (an unreadable file) and submissions refused because the same
/// kind of request is still running are written to `out`.
pub async fn run<B, V, R, W>(
    controller: Arc<ChatController<B, V>>,
    input: R,
    mut out: W,
) -> io::Result<()>
where
    B: Backend + ?Sized + 'static,
    V: View + ?Sized + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut flows = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        while let Some(result) = flows.try_join_next() {
            report(&mut out, result)?;
        }

        match Command::parse(&line) {
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Unknown(name) => {
                writeln!(out, "Unknown command /{name}. Type /help for a list.")?;
            }
            Command::Upload(path) => {
                let document = match path {
                    Some(path) => match read_document(&path, &mut out).await? {
                        Some(doc) => Some(doc),
                        None => continue,
                    },
                    None => None,
                };
                let refused = match &document {
                    Some(doc) => format!("{UPLOAD_BUSY_NOTICE}; {} not sent", doc.file_name),
                    None => format!("{UPLOAD_BUSY_NOTICE}; nothing sent"),
                };
                let controller = Arc::clone(&controller);
                flows.spawn(async move { (controller.submit_upload(document).await, refused) });
            }
            Command::AcceptFollowup => {
                let refused = format!("{CHAT_BUSY_NOTICE}; follow-up not sent");
                let controller = Arc::clone(&controller);
                flows.spawn(async move { (controller.accept_followup().await, refused) });
            }
            Command::Ask(text) => {
                let refused = format!("{CHAT_BUSY_NOTICE}; question not sent: {}", text.trim());
                let controller = Arc::clone(&controller);
                flows.spawn(async move { (controller.submit_chat(&text).await, refused) });
            }
        }
        out.flush()?;
    }

    while let Some(result) = flows.join_next().await {
        report(&mut out, result)?;
    }
    out.flush()
}

/// Upload the file at `path` before the prompt opens.
///
/// A file that cannot be read is reported on `out` and skipped, the same
/// way `/upload` handles it.
pub async fn upload_file<B, V, W>(
    controller: &ChatController<B, V>,
    path: &Path,
    out: &mut W,
) -> io::Result<FlowOutcome>
where
    B: Backend + ?Sized,
    V: View + ?Sized,
    W: Write,
{
    match read_document(path, out).await? {
        Some(document) => Ok(controller.submit_upload(Some(document)).await),
        None => Ok(FlowOutcome::Skipped),
    }
}

async fn read_document<W: Write>(path: &Path, out: &mut W) -> io::Result<Option<UploadDocument>> {
    match UploadDocument::from_path(path).await {
        Ok(document) => Ok(Some(document)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot read document");
            writeln!(out, "Cannot read {}: {e}", path.display())?;
            out.flush()?;
            Ok(None)
        }
    }
}

/// Tell the user about a finished flow that was refused.
fn report<W: Write>(
    out: &mut W,
    result: Result<(FlowOutcome, String), JoinError>,
) -> io::Result<()> {
    match result {
        Ok((FlowOutcome::Busy, refused)) => writeln!(out, "{refused}"),
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "Flow task failed");
            Ok(())
        }
    }
}
