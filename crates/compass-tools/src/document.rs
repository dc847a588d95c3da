//! Document analysis tool.
//!
//! Delegates extraction to the document-vision collaborator, then
//! normalizes the result: annualizes income from the pay period, masks any
//! visible SSN digits, and infers which programs the document supports.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use compass_core::types::{Confidence, DocumentInsights};
use compass_inference::DocumentVision;

use crate::error::ToolError;
use crate::registry::{ParamKind, ParamSpec, ToolHandler, ToolSpec};

static SPEC: ToolSpec = ToolSpec {
    name: "analyze_document",
    description: "Analyze an uploaded document image (pay stub, tax return, utility bill, \
                  medical record, benefit letter, lease, bank statement) and extract key \
                  financial and personal information. Use when the user has shared a document.",
    params: &[
        ParamSpec {
            name: "image_base64",
            kind: ParamKind::String,
            required: true,
            non_negative: false,
            description: "Base64-encoded image of the document.",
        },
        ParamSpec {
            name: "document_type",
            kind: ParamKind::String,
            required: false,
            non_negative: false,
            description: "Hint: 'pay_stub', 'tax_return', 'utility_bill', 'medical_record', \
                          'id_document', 'benefit_letter', 'lease', 'bank_statement', 'unknown'.",
        },
    ],
};

/// Handler wrapping the vision collaborator.
pub struct DocumentTool {
    vision: Arc<dyn DocumentVision>,
}

impl DocumentTool {
    pub fn new(vision: Arc<dyn DocumentVision>) -> Self {
        Self { vision }
    }
}

#[async_trait]
impl ToolHandler for DocumentTool {
    fn spec(&self) -> &'static ToolSpec {
        &SPEC
    }

    async fn execute(&self, input: &Value) -> Result<Value, ToolError> {
        let image = input["image_base64"].as_str().unwrap_or_default();
        let doc_type = input["document_type"].as_str().unwrap_or("unknown");

        let raw = self
            .vision
            .extract(image, doc_type)
            .await
            .map_err(|e| ToolError::Vision(e.to_string()))?;

        let insights = post_process(raw, doc_type);
        serde_json::to_value(&insights).map_err(|e| ToolError::Handler(e.to_string()))
    }
}

/// Normalize and enrich raw extraction output.
pub fn post_process(mut raw: Value, type_hint: &str) -> DocumentInsights {
    let detected_type = raw["document_type_detected"]
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(type_hint)
        .to_string();

    let mut annual_income_estimate = raw["annual_income_estimate"].as_f64();
    if annual_income_estimate.is_none() {
        annual_income_estimate = annualize_income(&raw["key_fields"]);
    }

    // Never persist visible SSN digits.
    if let Some(fields) = raw.get_mut("key_fields").and_then(|f| f.as_object_mut()) {
        if fields
            .get("ssn_last4")
            .is_some_and(|v| v.as_str().is_some_and(|s| !s.is_empty()))
        {
            fields.insert("ssn_last4".to_string(), Value::String("****".to_string()));
        }
    }

    let mut relevant_programs: Vec<String> = raw["relevant_programs"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();
    if relevant_programs.is_empty() {
        relevant_programs = infer_relevant_programs(&detected_type);
    }

    let confidence = match raw["confidence"].as_str() {
        Some("high") => Confidence::High,
        Some("medium") => Confidence::Medium,
        _ => Confidence::Low,
    };

    let flags = raw["flags"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();

    DocumentInsights {
        detected_type,
        key_fields: raw["key_fields"].clone(),
        annual_income_estimate: annual_income_estimate.map(|v| (v * 100.0).round() / 100.0),
        relevant_programs,
        flags,
        confidence,
        summary: raw["summary"].as_str().unwrap_or_default().to_string(),
    }
}

/// Estimate annual income from a gross amount and pay period.
fn annualize_income(key_fields: &Value) -> Option<f64> {
    let gross = match &key_fields["gross_income"] {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.replace(['$', ','], "").trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let period = key_fields["gross_income_period"]
        .as_str()
        .unwrap_or_default()
        .to_lowercase();
    let multiplier = match period.as_str() {
        "weekly" => 52.0,
        "biweekly" => 26.0,
        "semi_monthly" => 24.0,
        "annual" | "yearly" => 1.0,
        // Monthly is the most common pay-stub period; use it when unstated.
        _ => 12.0,
    };
    Some(gross * multiplier)
}

/// Which programs a document of this type typically supports.
fn infer_relevant_programs(doc_type: &str) -> Vec<String> {
    let programs: &[&str] = match doc_type {
        "pay_stub" | "tax_return" | "bank_statement" => {
            &["SNAP", "Medicaid", "TANF", "EITC", "LIHEAP", "Section 8"]
        }
        "utility_bill" => &["LIHEAP", "Section 8"],
        "medical_record" => &["Medicaid", "SSI", "Medicare Savings"],
        "lease" => &["Section 8", "TANF", "LIHEAP"],
        "benefit_letter" => &["Related program enrollment verification"],
        "id_document" => &["All programs requiring ID verification"],
        _ => &[],
    };
    programs.iter().map(|s| s.to_string()).collect()
}
