//! Conversation types and state management
//!
//! A [`Session`] owns the transcript of user and assistant turns. The system
//! prompt is never stored; it is prepended fresh by [`Session::build_request`]
//! on every turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Greeting every transcript starts with.
pub const GREETING: &str = "Hello! I'm ready to chat. What's on your mind?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Message is empty")]
    EmptyInput,
}

/// The active conversation. Always holds at least the greeting.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    messages: Vec<Message>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            messages: vec![Message::assistant(GREETING)],
        }
    }

    /// Ordered transcript, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn add_user(&mut self, content: &str) -> Result<(), SessionError> {
        if content.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        self.messages.push(Message::user(content));
        Ok(())
    }

    pub fn add_assistant(&mut self, content: &str) {
        self.messages.push(Message::assistant(content));
    }

    /// `[system] ++ transcript`, ready to send.
    pub fn build_request(&self, system_prompt: &str) -> Vec<Message> {
        let mut request = Vec::with_capacity(self.messages.len() + 1);
        request.push(Message::system(system_prompt));
        request.extend(self.messages.iter().cloned());
        request
    }

    /// Drop every turn and start over from the greeting.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
