//! Chat engine
//!
//! The ChatEngine owns the single active session. For each user message it:
//! 1. Applies a persona change, if the request carries one
//! 2. Appends the user turn to the transcript
//! 3. Builds `[system prompt] ++ transcript` for the current persona
//! 4. Sends it to the completion client
//! 5. Appends the reply (or the rendered failure) and returns it

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::{Config, Persona, PersonaSelection, PromptError};
use crate::conversation::{Message, Session, SessionError};
use crate::providers::{CompletionClient, CompletionErrorKind};

/// Request to the chat engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,

    /// Switch persona before sending: "friend", "teacher", "sibling" or "custom"
    #[serde(default)]
    pub persona: Option<String>,

    /// Character description used with the custom persona
    #[serde(default)]
    pub custom_character: Option<String>,
}

#[cfg(test)]
impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            persona: None,
            custom_character: None,
        }
    }
}

/// Response from the chat engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant's reply, or the rendered failure text
    pub message: String,

    pub session_id: Uuid,

    /// Persona the reply was generated under
    pub persona: PersonaSelection,

    /// Set when `message` is a failure rather than a model reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ReplyError>,

    /// Transcript length after this turn
    pub transcript_len: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyError {
    pub kind: CompletionErrorKind,
    pub detail: String,
}

/// Errors from the chat engine
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChatError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Persona(#[from] PromptError),
}

struct ChatState {
    session: Session,
    persona: Persona,
}

/// The core chat engine
pub struct ChatEngine {
    client: Arc<dyn CompletionClient>,
    state: Mutex<ChatState>,
    record_failed_replies: bool,
}

impl ChatEngine {
    /// Create a new chat engine
    pub fn new(config: &Config, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            state: Mutex::new(ChatState {
                session: Session::new(),
                persona: config.persona.clone(),
            }),
            record_failed_replies: config.record_failed_replies,
        }
    }

    /// Keep or drop failed completions from the transcript
    #[cfg(test)]
    pub fn with_record_failed_replies(mut self, record: bool) -> Self {
        self.record_failed_replies = record;
        self
    }

    pub async fn persona(&self) -> Persona {
        self.state.lock().await.persona.clone()
    }

    pub async fn set_persona(&self, persona: Persona) {
        tracing::info!(persona = %persona, "Persona changed");
        self.state.lock().await.persona = persona;
    }

    /// Snapshot of the active session
    pub async fn session(&self) -> Session {
        self.state.lock().await.session.clone()
    }

    /// Reset the transcript to the greeting
    pub async fn clear(&self) -> Session {
        let mut state = self.state.lock().await;
        state.session.reset();
        tracing::info!(session_id = %state.session.id, "Chat history cleared");
        state.session.clone()
    }

    /// Process a chat request and return a response.
    ///
    /// The state lock is held across the completion call, so turns are
    /// strictly sequential. Completion failures are not errors here: they come
    /// back as a reply with `error` set.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let mut state = self.state.lock().await;

        // A rejected turn leaves both the persona and the transcript untouched
        let persona = match request.persona {
            Some(ref id) => Some(Persona::from_parts(id, request.custom_character.as_deref())?),
            None => None,
        };

        state.session.add_user(&request.message)?;

        if let Some(persona) = persona {
            if persona != state.persona {
                tracing::info!(persona = %persona, "Persona changed");
                state.persona = persona;
            }
        }

        let messages: Vec<Message> = state
            .session
            .build_request(&state.persona.system_prompt());

        tracing::debug!(
            session_id = %state.session.id,
            persona = %state.persona,
            messages = messages.len(),
            "Requesting completion"
        );

        let (message, error) = match self.client.complete(&messages).await {
            Ok(reply) => {
                state.session.add_assistant(&reply);
                (reply, None)
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = %e.kind(), "Completion failed");
                let text = e.display(self.client.name());
                if self.record_failed_replies {
                    state.session.add_assistant(&text);
                }
                let error = ReplyError {
                    kind: e.kind(),
                    detail: e.to_string(),
                };
                (text, Some(error))
            }
        };

        Ok(ChatResponse {
            message,
            session_id: state.session.id,
            persona: PersonaSelection::from(&state.persona),
            error,
            transcript_len: state.session.len(),
        })
    }
}
