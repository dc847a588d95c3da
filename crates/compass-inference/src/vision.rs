//! Document-vision collaborator contract.
//!
//! Document extraction is an external capability: the document tool only
//! sees this trait. The converse-backed implementation sends the image with
//! an extraction prompt and expects a strict JSON reply.

use async_trait::async_trait;
use tracing::warn;

use crate::bedrock::BedrockClient;
use crate::client::InferenceClient;
use crate::error::InferenceError;
use crate::types::{ContentBlock, ImageBlock, ImageSource, Message, Role};

/// Extraction prompt sent with each document image. The reply must be a
/// single JSON object; markdown fences are stripped defensively.
const DOCUMENT_EXTRACTION_PROMPT: &str = r#"You are analyzing a document to extract key information for benefit eligibility screening.

Document type hint: {document_type}

Return a JSON object with ALL of these fields (null when not found):
{
  "document_type_detected": "pay_stub | tax_return | utility_bill | medical_record | id_document | benefit_letter | lease | bank_statement | other",
  "key_fields": {
    "name": "full name of person",
    "date": "most recent date on the document (YYYY-MM-DD)",
    "employer_name": "employer or organization if applicable",
    "gross_income": "gross income amount as a bare number",
    "gross_income_period": "weekly | biweekly | semi_monthly | monthly | annual",
    "net_income": "net income as a bare number if shown",
    "address": "street address if present",
    "ssn_last4": "last 4 of SSN if visible"
  },
  "annual_income_estimate": "estimated annual gross income as a number, or null",
  "relevant_programs": ["benefit programs this document supports"],
  "flags": ["notable observations, e.g. 'recent job loss'"],
  "confidence": "high | medium | low",
  "summary": "one sentence describing what the document shows"
}

Numbers must not contain $ symbols or commas. Return only valid JSON."#;

const EXTRACTION_SYSTEM_PROMPT: &str = "You are a precise document analysis assistant. \
     Extract information exactly as it appears. When asked for JSON, return only valid JSON \
     with no markdown formatting.";

/// External document extraction capability.
#[async_trait]
pub trait DocumentVision: Send + Sync {
    /// Extract structured fields from a base64-encoded document image.
    async fn extract(
        &self,
        image_base64: &str,
        document_type: &str,
    ) -> Result<serde_json::Value, InferenceError>;
}

/// Placeholder used when no vision service is configured. Always errors, so
/// the tool reports a structured failure the model can relay to the user.
pub struct NoVision;

#[async_trait]
impl DocumentVision for NoVision {
    async fn extract(
        &self,
        _image_base64: &str,
        _document_type: &str,
    ) -> Result<serde_json::Value, InferenceError> {
        Err(InferenceError::InvalidResponse(
            "document vision service is not configured".to_string(),
        ))
    }
}

#[async_trait]
impl DocumentVision for BedrockClient {
    async fn extract(
        &self,
        image_base64: &str,
        document_type: &str,
    ) -> Result<serde_json::Value, InferenceError> {
        let prompt = DOCUMENT_EXTRACTION_PROMPT.replace("{document_type}", document_type);
        let message = Message {
            role: Role::User,
            content: vec![
                ContentBlock::Image(ImageBlock {
                    format: "jpeg".to_string(),
                    source: ImageSource {
                        bytes: image_base64.to_string(),
                    },
                }),
                ContentBlock::Text(prompt),
            ],
        };

        let response = self
            .converse(&[message], EXTRACTION_SYSTEM_PROMPT, &[])
            .await?;

        let cleaned = strip_markdown_fences(&response.text);
        serde_json::from_str(cleaned).map_err(|e| {
            warn!(error = %e, "Document extraction reply was not valid JSON");
            InferenceError::InvalidResponse(format!("extraction reply was not JSON: {}", e))
        })
    }
}

/// Strip a surrounding ```...``` fence, if present.
fn strip_markdown_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    let inner = match inner.find('\n') {
        Some(idx) => &inner[idx + 1..],
        None => inner,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
