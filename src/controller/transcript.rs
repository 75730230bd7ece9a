//! Append-only chat transcript.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// A single chat message. Never modified once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    role: Role,
    text: String,
    sent_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Role::Bot, text)
    }

    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }
}

/// One row of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(Message),
    /// The typing indicator shown while a chat request is outstanding.
    Pending,
}

/// Ordered transcript entries.
///
/// Messages are only ever appended. The typing indicator, when present,
/// is always the last entry and there is at most one of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, keeping the typing indicator (if any) last.
    pub fn push(&mut self, message: Message) {
        if self.is_typing() {
            let at = self.entries.len() - 1;
            self.entries.insert(at, Entry::Message(message));
        } else {
            self.entries.push(Entry::Message(message));
        }
    }

    /// Show the typing indicator. Returns `false` if it was already shown.
    pub fn show_typing(&mut self) -> bool {
        if self.is_typing() {
            return false;
        }
        self.entries.push(Entry::Pending);
        true
    }

    /// Remove the typing indicator. Returns `false` if it was not shown.
    pub fn remove_typing(&mut self) -> bool {
        if self.is_typing() {
            self.entries.pop();
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        matches!(self.entries.last(), Some(Entry::Pending))
    }

    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Messages in order, without the typing indicator.
    pub fn messages(&self) -> impl DoubleEndedIterator<Item = &Message> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Message(m) => Some(m),
            Entry::Pending => None,
        })
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages().count()
    }

    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages().next_back()
    }
}
