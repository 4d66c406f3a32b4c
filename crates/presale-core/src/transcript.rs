//! Chat widget transcript
//!
//! In-memory only: nothing survives a reload, nothing is truncated.

use crate::message::{Message, Role};
use crate::prompt::WIDGET_GREETING;

#[derive(Clone, Debug)]
pub struct ChatTranscript {
    messages: Vec<Message>,
    pending: bool,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTranscript {
    /// Transcript seeded with the assistant greeting
    pub fn new() -> Self {
        Self::with_messages(vec![Message::assistant(WIDGET_GREETING)])
    }

    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            pending: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Append the visitor's message and return the full outbound transcript.
    ///
    /// Returns `None` (and changes nothing) for blank input or while a
    /// previous request is still in flight.
    pub fn begin(&mut self, text: &str) -> Option<Vec<Message>> {
        if text.trim().is_empty() || self.pending {
            return None;
        }

        self.messages.push(Message::user(text));
        self.pending = true;
        Some(self.messages.clone())
    }

    /// The call resolved: append the assistant reply
    pub fn resolve(&mut self, reply: impl Into<String>) {
        self.messages.push(Message::new(Role::Assistant, reply));
        self.pending = false;
    }

    /// The call failed: nothing is appended
    pub fn reject(&mut self) {
        self.pending = false;
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
