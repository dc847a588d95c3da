//! Route handler functions for all API endpoints.
//!
//! Each handler extracts path/body parameters via axum extractors,
//! interacts with the orchestrator or store, and returns JSON responses.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

use compass_core::types::{PortalOutcome, Session, SessionSnapshot, ToolCallRecord};
use compass_engine::catalog;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
    pub tool_calls_made: Vec<ToolCallRecord>,
    pub truncated: bool,
    pub session_data: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub model_id: String,
    pub program_count: usize,
    pub uptime_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub session_id: String,
    pub program_id: String,
}

#[derive(Debug, Serialize)]
pub struct ProgramInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    pub category: &'static str,
    pub apply_url: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProgramsResponse {
    pub programs: Vec<ProgramInfo>,
}

#[derive(Debug, Serialize)]
pub struct PersonaInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub intro: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PersonasResponse {
    pub personas: Vec<PersonaInfo>,
}

#[derive(Debug, Serialize)]
pub struct DemoResponse {
    pub session_id: String,
    pub persona: &'static str,
    pub persona_label: &'static str,
    pub persona_intro: &'static str,
    pub seed_message: &'static str,
    pub response: String,
    pub tool_calls_made: Vec<ToolCallRecord>,
    pub session_data: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

// =============================================================================
// Demo personas
// =============================================================================

/// Seed scenarios that walk the full agent loop without personal data.
struct Persona {
    id: &'static str,
    label: &'static str,
    intro: &'static str,
    message: &'static str,
}

static PERSONAS: &[Persona] = &[
    Persona {
        id: "single_parent",
        label: "Single Parent",
        intro: "Meet Maria, a single mom in Oakland who recently lost her job and needs help \
                finding food assistance and healthcare for her kids.",
        message: "Hi, I'm Maria. I'm a single mom with two kids, ages 3 and 7, living in \
                  Oakland, California. I lost my job as a bus driver 6 weeks ago and my income \
                  right now is basically zero. I'm really struggling to pay for groceries and \
                  my kids need to see a doctor but I don't have health insurance anymore. My \
                  zip code is 94601. I'm not sure what help I can get.",
    },
    Persona {
        id: "senior",
        label: "Senior Citizen",
        intro: "Meet Robert, a 71-year-old retiree in San Antonio struggling with Medicare \
                costs, utility bills, and prescription expenses.",
        message: "Hello, I'm Robert. I'm 71 years old, retired, and living alone in San \
                  Antonio, Texas. My only income is Social Security, about $1,200 a month. I'm \
                  having a hard time paying my Medicare premium and my electricity bills keep \
                  going up. My zip code is 78201. What assistance might I qualify for?",
    },
    Persona {
        id: "veteran",
        label: "Veteran",
        intro: "Meet James, a disabled veteran in Tampa working part-time who may be missing \
                out on benefits he's earned.",
        message: "Hi, my name is James. I'm a 45-year-old Army veteran living in Tampa, \
                  Florida with my wife. I have a service-connected disability and I work \
                  part-time, earning about $18,000 a year. Between us we have a household of \
                  2. I need help with food costs and I'm not sure I'm taking advantage of all \
                  the benefits I'm entitled to. My zip code is 33601.",
    },
];

// =============================================================================
// Handlers
// =============================================================================

/// GET /health - service status and catalog readiness.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "Compass Benefits Navigator",
        model_id: state.config.inference.model_id.clone(),
        program_count: catalog().len(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /api/chat - run one conversational turn to completion.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    tracing::debug!(
        language = request.language.as_deref().unwrap_or("en"),
        "Chat turn submitted"
    );
    let output = state
        .orchestrator
        .chat(request.session_id, &request.message)
        .await?;

    Ok(Json(ChatResponse {
        session_id: output.session_id,
        response: output.response,
        tool_calls_made: output.tool_calls,
        truncated: output.truncated,
        session_data: output.session.snapshot(),
    }))
}

/// POST /api/chat/stream - SSE variant of the chat endpoint.
///
/// Emits phase/delta events followed by a terminal done event. A client
/// disconnect stops delivery only; the turn still completes and persists.
pub async fn chat_stream(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>> + Send>, ApiError> {
    let rx = state
        .orchestrator
        .chat_stream(request.session_id, request.message)?;

    let stream = ReceiverStream::new(rx).map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_default();
        Ok(Event::default().data(data))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

/// GET /api/session/{id} - full session snapshot.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .store
        .get(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {}", id)))?;
    Ok(Json(session))
}

/// DELETE /api/session/{id} - caller-initiated removal.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.store.delete(&id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("session not found: {}", id)));
    }
    Ok(Json(DeletedResponse { deleted }))
}

/// GET /api/programs - the static program catalog.
pub async fn list_programs() -> Json<ProgramsResponse> {
    let programs = catalog()
        .iter()
        .map(|p| ProgramInfo {
            id: p.id,
            name: p.name,
            short_name: p.short_name,
            category: p.category,
            apply_url: p.apply_url,
        })
        .collect();
    Json(ProgramsResponse { programs })
}

/// GET /api/personas - available demo personas.
pub async fn list_personas() -> Json<PersonasResponse> {
    let personas = PERSONAS
        .iter()
        .map(|p| PersonaInfo {
            id: p.id,
            label: p.label,
            intro: p.intro,
        })
        .collect();
    Json(PersonasResponse { personas })
}

/// POST /api/demo/{persona} - run a scripted scenario through the full
/// agent loop.
pub async fn run_demo(
    State(state): State<AppState>,
    Path(persona_id): Path<String>,
) -> Result<Json<DemoResponse>, ApiError> {
    let persona = PERSONAS
        .iter()
        .find(|p| p.id == persona_id)
        .ok_or_else(|| ApiError::NotFound(format!("unknown persona: {}", persona_id)))?;

    let session_id = format!(
        "demo_{}_{}",
        persona.id,
        &Uuid::new_v4().simple().to_string()[..6]
    );
    let output = state
        .orchestrator
        .chat(Some(session_id), persona.message)
        .await?;

    Ok(Json(DemoResponse {
        session_id: output.session_id,
        persona: persona.id,
        persona_label: persona.label,
        persona_intro: persona.intro,
        seed_message: persona.message,
        response: output.response,
        tool_calls_made: output.tool_calls,
        session_data: output.session.snapshot(),
    }))
}

/// POST /api/navigate - forward an application to the portal driver.
pub async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<PortalOutcome>, ApiError> {
    let outcome = state
        .orchestrator
        .navigate(&request.session_id, &request.program_id)
        .await?;
    Ok(Json(outcome))
}
