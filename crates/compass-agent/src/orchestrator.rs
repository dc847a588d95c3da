//! The per-turn conversation state machine.
//!
//! Each turn runs a bounded loop: send the visible history plus the tool
//! catalog to the inference service; execute any requested tools through
//! the registry and feed the results back; finish when the model returns
//! only text. A hard round cap prevents runaway tool chains, and tool
//! failures are recorded in the trace and fed back to the model rather
//! than aborting the turn.

use std::sync::Arc;

use chrono::Utc;
use regex::Regex;
use tokio::sync::mpsc;
use tracing::{info, warn};

use compass_core::config::AgentConfig;
use compass_core::session::TurnDelta;
use compass_core::types::{
    ActionPlan, Confidence, DocumentInsights, EligibilityReport, HouseholdProfile, PortalOutcome,
    Resource, Session, ToolCallRecord, Turn,
};
use compass_engine::program_by_id;
use compass_inference::{
    InferenceClient, InferenceResponse, Message, StopReason, ToolDefinition, ToolResultBlock,
};
use compass_inference::types::ToolResultContent;
use compass_store::SessionRepository;
use compass_tools::{profile_from_input, ToolRegistry};

use crate::error::AgentError;
use crate::portal::{PortalDriver, PortalRequest};
use crate::prompt::COMPASS_SYSTEM_PROMPT;
use crate::stream::{chunk_text, TurnEvent};

/// Retry behavior for transient inference failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Initial backoff; doubles per attempt.
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_ms: 250,
        }
    }
}

/// Result of one completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutput {
    pub session_id: String,
    pub response: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub truncated: bool,
    pub session: Session,
}

/// Coordinates inference, tool dispatch, and session persistence.
pub struct Orchestrator {
    inference: Arc<dyn InferenceClient>,
    registry: Arc<ToolRegistry>,
    store: Arc<SessionRepository>,
    portal: Arc<dyn PortalDriver>,
    config: AgentConfig,
    retry: RetryPolicy,
    tool_definitions: Vec<ToolDefinition>,
}

impl Orchestrator {
    pub fn new(
        inference: Arc<dyn InferenceClient>,
        registry: Arc<ToolRegistry>,
        store: Arc<SessionRepository>,
        portal: Arc<dyn PortalDriver>,
        config: AgentConfig,
        retry: RetryPolicy,
    ) -> Self {
        let tool_definitions = registry.specs();
        Self {
            inference,
            registry,
            store,
            portal,
            config,
            retry,
            tool_definitions,
        }
    }

    /// Process one user message and return the completed turn.
    pub async fn chat(
        &self,
        session_id: Option<String>,
        message: &str,
    ) -> Result<TurnOutput, AgentError> {
        self.validate_message(message)?;
        self.run_turn(session_id, message, None).await
    }

    /// Process one user message, streaming turn events to the returned
    /// receiver. The turn keeps running and persists even if the receiver
    /// is dropped.
    pub fn chat_stream(
        self: &Arc<Self>,
        session_id: Option<String>,
        message: String,
    ) -> Result<mpsc::Receiver<TurnEvent>, AgentError> {
        self.validate_message(&message)?;
        let (tx, rx) = mpsc::channel(64);
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = orchestrator
                .run_turn(session_id, &message, Some(tx.clone()))
                .await
            {
                warn!(error = %e, "Streaming turn failed");
                let _ = tx
                    .send(TurnEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
            }
        });
        Ok(rx)
    }

    /// Forward an application to the portal driver and record the outcome
    /// on the session.
    pub async fn navigate(
        &self,
        session_id: &str,
        program_id: &str,
    ) -> Result<PortalOutcome, AgentError> {
        let session = self
            .store
            .get(session_id)?
            .ok_or_else(|| AgentError::SessionNotFound(session_id.to_string()))?;
        let program = program_by_id(program_id)
            .ok_or_else(|| AgentError::UnknownProgram(program_id.to_string()))?;

        let request = PortalRequest {
            session_id: session_id.to_string(),
            program_id: program.id.to_string(),
            program_name: program.name.to_string(),
            apply_url: program.apply_url.to_string(),
            profile: session.profile.clone(),
        };
        let outcome = self.portal.drive(&request).await?;

        let delta = TurnDelta {
            portal: Some(outcome.clone()),
            ..TurnDelta::default()
        };
        self.store.apply_turn(session_id, &delta).await?;
        Ok(outcome)
    }

    fn validate_message(&self, message: &str) -> Result<(), AgentError> {
        if message.is_empty() {
            return Err(AgentError::EmptyMessage);
        }
        if message.len() > self.config.max_message_length {
            return Err(AgentError::MessageTooLong(self.config.max_message_length));
        }
        Ok(())
    }

    /// The turn state machine. With an event sender, phase markers are
    /// emitted during tool rounds and the final answer is delivered as
    /// fragments before the terminal event.
    async fn run_turn(
        &self,
        session_id: Option<String>,
        user_message: &str,
        events: Option<mpsc::Sender<TurnEvent>>,
    ) -> Result<TurnOutput, AgentError> {
        let session = self.store.create_or_load(session_id).await?;

        let mut messages = visible_history(&session);
        messages.push(Message::user_text(user_message));

        let mut delta = TurnDelta::default();
        let mut trace: Vec<ToolCallRecord> = Vec::new();
        let mut final_text: Option<String> = None;
        let mut truncated = false;

        for _round in 0..self.config.max_tool_rounds {
            let response = match self.converse_with_retry(&messages).await {
                Ok(response) => response,
                Err(e) => {
                    // Degraded turn: apologize and surface whatever was
                    // already gathered instead of failing the request.
                    warn!(error = %e, "Inference failed after retries; degrading turn");
                    final_text = Some(degraded_response(&delta));
                    break;
                }
            };

            match response.stop_reason {
                StopReason::EndTurn => {
                    final_text = Some(strip_thinking(&response.text));
                    break;
                }
                StopReason::ToolUse => {
                    self.run_tool_round(&response, &mut messages, &mut delta, &mut trace, &events)
                        .await;
                }
                other => {
                    warn!(stop_reason = ?other, "Unexpected stop reason");
                    let text = strip_thinking(&response.text);
                    final_text = Some(if text.is_empty() {
                        "I ran into an issue composing a reply. Please try again.".to_string()
                    } else {
                        text
                    });
                    break;
                }
            }
        }

        // Loop exhaustion is not an error: close the turn with a
        // best-effort answer and flag the trace.
        let response_text = final_text.unwrap_or_else(|| {
            truncated = true;
            truncated_response(&delta)
        });

        delta.turn = Some(Turn {
            user_message: user_message.to_string(),
            assistant_message: response_text.clone(),
            tool_calls: trace.clone(),
            truncated,
            created_at: Utc::now(),
        });

        let updated = self.store.apply_turn(&session.id, &delta).await?;
        info!(
            session_id = %updated.id,
            tool_calls = trace.len(),
            truncated,
            "Turn complete"
        );

        if let Some(tx) = &events {
            for fragment in chunk_text(&response_text) {
                let _ = tx.send(TurnEvent::Delta { text: fragment }).await;
            }
            let _ = tx
                .send(TurnEvent::Done {
                    session_id: updated.id.clone(),
                    response: response_text.clone(),
                    tool_calls: trace.clone(),
                    truncated,
                    session_data: updated.snapshot(),
                })
                .await;
        }

        Ok(TurnOutput {
            session_id: updated.id.clone(),
            response: response_text,
            tool_calls: trace,
            truncated,
            session: updated,
        })
    }

    /// Execute every tool call in a tool-use response and append the
    /// results to the conversation.
    async fn run_tool_round(
        &self,
        response: &InferenceResponse,
        messages: &mut Vec<Message>,
        delta: &mut TurnDelta,
        trace: &mut Vec<ToolCallRecord>,
        events: &Option<mpsc::Sender<TurnEvent>>,
    ) {
        messages.push(response.raw_message.clone());

        let mut results = Vec::new();
        for call in &response.tool_calls {
            if let Some(tx) = events {
                let _ = tx
                    .send(TurnEvent::Phase {
                        tool: call.name.clone(),
                    })
                    .await;
            }

            let (output, elapsed_ms) = match self.registry.dispatch(&call.name, &call.input).await
            {
                Ok(outcome) => {
                    merge_tool_output(delta, &call.name, &call.input, &outcome.output);
                    (outcome.output, outcome.elapsed_ms)
                }
                Err(e) => {
                    // Recorded and fed back so the model can reformulate.
                    warn!(tool = %call.name, error = %e, "Tool call failed");
                    (serde_json::json!({ "error": e.to_string() }), 0)
                }
            };

            trace.push(ToolCallRecord {
                name: call.name.clone(),
                input: call.input.clone(),
                output: output.clone(),
                elapsed_ms,
                timestamp: Utc::now(),
            });
            results.push(ToolResultBlock {
                tool_use_id: call.tool_use_id.clone(),
                content: vec![ToolResultContent::Json(output)],
            });
        }

        messages.push(Message::tool_results(results));
    }

    async fn converse_with_retry(
        &self,
        messages: &[Message],
    ) -> Result<InferenceResponse, AgentError> {
        let mut backoff = self.retry.backoff_ms;
        let mut attempt = 0;
        loop {
            match self
                .inference
                .converse(messages, COMPASS_SYSTEM_PROMPT, &self.tool_definitions)
                .await
            {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, "Transient inference failure; retrying");
                    tokio::time::sleep(std::time::Duration::from_millis(backoff)).await;
                    backoff *= 2;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Flatten the session transcript into the visible inference history.
fn visible_history(session: &Session) -> Vec<Message> {
    let mut messages = Vec::with_capacity(session.turns.len() * 2);
    for turn in &session.turns {
        messages.push(Message::user_text(&turn.user_message));
        messages.push(Message::assistant_text(&turn.assistant_message));
    }
    messages
}

/// Fold a successful tool output into the turn delta.
fn merge_tool_output(
    delta: &mut TurnDelta,
    tool_name: &str,
    input: &serde_json::Value,
    output: &serde_json::Value,
) {
    match tool_name {
        "check_benefit_eligibility" => {
            if let Ok(report) = serde_json::from_value::<EligibilityReport>(output.clone()) {
                delta.results = Some(report.results);
            }
            delta.profile.merge(&profile_from_input(input));
        }
        "find_local_resources" => {
            if let Ok(resources) = serde_json::from_value::<Vec<Resource>>(output["resources"].clone())
            {
                for resource in resources {
                    if !delta.resources.iter().any(|r| r.name == resource.name) {
                        delta.resources.push(resource);
                    }
                }
            }
            delta.profile.merge(&HouseholdProfile {
                zip_code: input["zip_code"].as_str().map(|s| s.to_string()),
                ..HouseholdProfile::default()
            });
        }
        "analyze_document" => {
            if let Ok(insights) = serde_json::from_value::<DocumentInsights>(output.clone()) {
                if matches!(insights.confidence, Confidence::High | Confidence::Medium) {
                    delta.profile.merge(&HouseholdProfile {
                        annual_income: insights.annual_income_estimate,
                        ..HouseholdProfile::default()
                    });
                }
                delta.document = Some(insights);
            }
        }
        "create_action_plan" => {
            if let Ok(plan) = serde_json::from_value::<ActionPlan>(output.clone()) {
                delta.plan = Some(plan);
            }
        }
        _ => {}
    }
}

/// Remove model reasoning spans from the final answer.
fn strip_thinking(text: &str) -> String {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?s)<thinking>.*?</thinking>").unwrap());
    re.replace_all(text, "").trim().to_string()
}

/// Best-effort answer when the round cap forces the turn closed.
fn truncated_response(delta: &TurnDelta) -> String {
    let mut text = String::from("I've gathered a lot about your situation. ");
    if let Some(results) = &delta.results {
        text.push_str(&format!(
            "I found {} program(s) you may qualify for. ",
            results.len()
        ));
    }
    if !delta.resources.is_empty() {
        text.push_str(&format!(
            "I also found {} local resource(s) near you. ",
            delta.resources.len()
        ));
    }
    text.push_str("Please review the results, and ask me to continue if you'd like more detail.");
    text
}

/// Apologetic answer when inference stays unavailable after retries.
fn degraded_response(delta: &TurnDelta) -> String {
    let mut text = String::from(
        "I'm sorry, I'm having trouble reaching my reasoning service right now. ",
    );
    if delta.results.is_some() || !delta.resources.is_empty() {
        text.push_str("I've kept the results gathered so far on your session. ");
    }
    text.push_str("Please try again in a moment.");
    text
}

// =============================================================================
// Tests
// =============================================================================
