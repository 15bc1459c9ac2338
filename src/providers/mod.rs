//! Completion endpoint integrations

mod openai_compat;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::Message;

pub use openai_compat::{OpenAICompatConfig, OpenAICompatProvider};

/// Broad class of a completion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionErrorKind {
    /// The request never produced an HTTP response
    Transport,
    /// Non-2xx status or a body without a usable completion
    Upstream,
}

impl fmt::Display for CompletionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionErrorKind::Transport => f.write_str("transport"),
            CompletionErrorKind::Upstream => f.write_str("upstream"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    pub fn kind(&self) -> CompletionErrorKind {
        match self {
            CompletionError::Transport(_) => CompletionErrorKind::Transport,
            CompletionError::Status { .. } | CompletionError::InvalidResponse(_) => {
                CompletionErrorKind::Upstream
            }
        }
    }

    /// Text shown to the user in place of a reply
    pub fn display(&self, provider: &str) -> String {
        format!("Error: Unable to get response from {}. {}", provider, self)
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => CompletionError::Status {
                status: status.as_u16(),
                detail: err.to_string(),
            },
            None if err.is_decode() => CompletionError::InvalidResponse(err.to_string()),
            None => CompletionError::Transport(err.to_string()),
        }
    }
}

/// Anything that can turn a message list into a reply
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Human-readable name used in error messages
    fn name(&self) -> &str;

    /// Send `messages` (system prompt first) and return the reply text
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError>;
}

#[async_trait]
impl CompletionClient for OpenAICompatProvider {
    fn name(&self) -> &str {
        &self.config().provider_name
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        self.chat(messages).await
    }
}
