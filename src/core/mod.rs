//! Core chat components
//!
//! This module contains the orchestration that turns a user message into a
//! persona-prompted completion request and records the reply.

mod chat;

pub use chat::{ChatEngine, ChatError, ChatRequest, ChatResponse, ReplyError};
