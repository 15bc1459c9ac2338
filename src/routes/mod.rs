//! API routes

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use crate::config::{prompts, Persona, PersonaSelection};
use crate::conversation::Session;
use crate::core::{ChatError, ChatRequest, ChatResponse};
use crate::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct PersonaInfo {
    id: &'static str,
    description: &'static str,
}

#[derive(Debug, Serialize)]
struct PersonaResponse {
    #[serde(flatten)]
    selection: PersonaSelection,
    system_prompt: String,
}

impl From<&Persona> for PersonaResponse {
    fn from(persona: &Persona) -> Self {
        Self {
            selection: PersonaSelection::from(persona),
            system_prompt: persona.system_prompt(),
        }
    }
}

/// Rejected requests, returned as `{"error": "..."}`
struct ApiError(StatusCode, String);

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        ApiError(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl From<prompts::PromptError> for ApiError {
    fn from(err: prompts::PromptError) -> Self {
        ApiError(StatusCode::BAD_REQUEST, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_personas() -> Json<Vec<PersonaInfo>> {
    Json(
        Persona::IDS
            .iter()
            .map(|&id| PersonaInfo {
                id,
                description: prompts::describe(id),
            })
            .collect(),
    )
}

async fn get_persona(State(state): State<AppState>) -> Json<PersonaResponse> {
    let persona = state.chat_engine.persona().await;
    Json(PersonaResponse::from(&persona))
}

async fn set_persona(
    State(state): State<AppState>,
    Json(selection): Json<PersonaSelection>,
) -> Result<Json<PersonaResponse>, ApiError> {
    let persona = selection.resolve()?;
    let response = PersonaResponse::from(&persona);
    state.chat_engine.set_persona(persona).await;
    Ok(Json(response))
}

async fn get_session(State(state): State<AppState>) -> Json<Session> {
    Json(state.chat_engine.session().await)
}

async fn clear_session(State(state): State<AppState>) -> Json<Session> {
    Json(state.chat_engine.clear().await)
}

async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let response = state.chat_engine.chat(request).await?;
    Ok(Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/v1/personas", get(list_personas))
        .route("/v1/persona", get(get_persona).put(set_persona))
        .route("/v1/session", get(get_session).delete(clear_session))
        .route("/v1/chat", post(chat))
}
