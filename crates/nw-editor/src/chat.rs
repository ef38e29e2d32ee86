//! Chat log with token-addressed placeholders.
//!
//! A prompt appends the user's message and a "Thinking..." placeholder
//! carrying a fresh `RequestToken`. When the response arrives the
//! placeholder holding that token is replaced in place. Matching is by
//! token, never by position, so responses may arrive in any order.

use nw_core::{EditError, Result};
use serde::Serialize;

pub const THINKING: &str = "Thinking...";

/// Identifies one in-flight collaborator request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl RequestToken {
    pub const fn from_raw(raw: u64) -> Self {
        RequestToken(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// Set while this message is a placeholder awaiting a response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<RequestToken>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    next_token: u64,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            sender: Sender::User,
            text: text.into(),
            pending: None,
        });
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            sender: Sender::Assistant,
            text: text.into(),
            pending: None,
        });
    }

    /// Append a placeholder and return its token.
    pub fn push_placeholder(&mut self) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.messages.push(ChatMessage {
            sender: Sender::Assistant,
            text: THINKING.to_string(),
            pending: Some(token),
        });
        token
    }

    /// Replace the placeholder holding `token`.
    pub fn resolve(&mut self, token: RequestToken, text: impl Into<String>) -> Result<()> {
        let msg = self
            .messages
            .iter_mut()
            .find(|m| m.pending == Some(token))
            .ok_or(EditError::UnknownRequest(token.raw()))?;
        msg.text = text.into();
        msg.pending = None;
        Ok(())
    }

    pub fn is_pending(&self, token: RequestToken) -> bool {
        self.messages.iter().any(|m| m.pending == Some(token))
    }

    pub fn pending_count(&self) -> usize {
        self.messages.iter().filter(|m| m.pending.is_some()).count()
    }
}
