//! Action-plan assembly tool.
//!
//! Deterministic composition: organizes application steps by urgency
//! (immediate, short-term, ongoing) from the eligibility results and local
//! resources gathered earlier in the conversation. Each step carries a
//! stable key so re-assembly upserts rather than duplicates.

use async_trait::async_trait;
use serde_json::Value;

use compass_core::types::{ActionPlan, ActionStep, Urgency};
use compass_engine::program_by_id;

use crate::error::ToolError;
use crate::registry::{ParamKind, ParamSpec, ToolHandler, ToolSpec};

static SPEC: ToolSpec = ToolSpec {
    name: "create_action_plan",
    description: "Generate a personalized, prioritized action plan listing the specific steps \
                  the user should take to apply for benefits and access resources. Call after \
                  the eligibility check and resource discovery.",
    params: &[
        ParamSpec {
            name: "eligible_programs",
            kind: ParamKind::ObjectArray,
            required: true,
            non_negative: false,
            description: "Eligible programs from the check_benefit_eligibility results.",
        },
        ParamSpec {
            name: "local_resources",
            kind: ParamKind::ObjectArray,
            required: true,
            non_negative: false,
            description: "Local resources from the find_local_resources results.",
        },
        ParamSpec {
            name: "user_situation",
            kind: ParamKind::String,
            required: true,
            non_negative: false,
            description: "Brief summary of the user's situation, needs, and urgency.",
        },
        ParamSpec {
            name: "language",
            kind: ParamKind::String,
            required: false,
            non_negative: false,
            description: "Language for the action plan ('en', 'es', ...).",
        },
    ],
};

/// Resource kinds that signal an immediate crisis step.
const CRISIS_KINDS: [&str; 3] = ["shelter", "crisis_support", "food_bank"];

/// Assemble the plan from prior tool outputs.
pub fn build_action_plan(
    eligible_programs: &[Value],
    local_resources: &[Value],
    user_situation: &str,
) -> ActionPlan {
    let mut steps: Vec<ActionStep> = Vec::new();

    // Immediate: crisis resources first.
    let has_crisis_resource = local_resources.iter().any(|r| {
        r["kind"]
            .as_str()
            .is_some_and(|k| CRISIS_KINDS.contains(&k))
    });
    if has_crisis_resource {
        steps.push(ActionStep {
            key: "immediate_help".to_string(),
            step: 0,
            title: "Get Immediate Help".to_string(),
            description: "Call 2-1-1 for emergency food, shelter, or crisis support available today."
                .to_string(),
            action: "Call or text 2-1-1".to_string(),
            urgency: Urgency::Immediate,
            program_id: None,
            timeline: None,
        });
    }

    // Short-term: apply for the strongest matches.
    let priority: Vec<&Value> = eligible_programs
        .iter()
        .filter(|p| p["likelihood"].as_str() == Some("High"))
        .take(3)
        .collect();
    for program in priority {
        let id = program["program_id"].as_str().unwrap_or_default();
        let short_name = program["short_name"].as_str().unwrap_or(id);
        let value = program["estimated_value"].as_str().unwrap_or("varies");
        let catalog_entry = program_by_id(id);
        let how_to_apply = catalog_entry.map(|p| p.how_to_apply).unwrap_or_default();
        let apply_url = program["apply_url"]
            .as_str()
            .filter(|u| !u.is_empty())
            .unwrap_or("https://www.benefits.gov");

        steps.push(ActionStep {
            key: id.to_string(),
            step: 0,
            title: format!("Apply for {}", short_name),
            description: format!("Estimated value: {}. {}", value, how_to_apply),
            action: format!("Apply at: {}", apply_url),
            urgency: Urgency::ShortTerm,
            program_id: Some(id.to_string()),
            timeline: catalog_entry.map(|p| p.timeline.to_string()),
        });
    }

    steps.push(ActionStep {
        key: "gather_documents".to_string(),
        step: 0,
        title: "Gather Required Documents".to_string(),
        description: "For most applications you'll need: photo ID, proof of address (utility \
                      bill or lease), proof of income (pay stubs or tax return), and Social \
                      Security numbers for household members."
            .to_string(),
        action: "Collect documents before applying".to_string(),
        urgency: Urgency::ShortTerm,
        program_id: None,
        timeline: None,
    });

    // Ongoing: follow-ups.
    steps.push(ActionStep {
        key: "follow_up".to_string(),
        step: 0,
        title: "Follow Up on Applications".to_string(),
        description: "Track your application status and respond promptly to any requests for \
                      additional information."
            .to_string(),
        action: "Keep records of all applications and confirmation numbers".to_string(),
        urgency: Urgency::Ongoing,
        program_id: None,
        timeline: None,
    });

    if let Some(eitc) = eligible_programs
        .iter()
        .find(|p| p["program_id"].as_str() == Some("eitc"))
    {
        let value = eitc["estimated_value"].as_str().unwrap_or_default();
        steps.push(ActionStep {
            key: "eitc_reminder".to_string(),
            step: 0,
            title: "Claim Your Tax Credit".to_string(),
            description: format!(
                "File your taxes to claim the Earned Income Tax Credit. {}. Free tax prep is \
                 available.",
                value
            ),
            action: "Call 1-800-906-9887 for free VITA tax preparation".to_string(),
            urgency: Urgency::Ongoing,
            program_id: Some("eitc".to_string()),
            timeline: None,
        });
    }

    for (i, step) in steps.iter_mut().enumerate() {
        step.step = (i + 1) as u32;
    }

    ActionPlan {
        title: "Your Benefits Action Plan".to_string(),
        situation: user_situation.to_string(),
        steps,
        reminder: "This plan is a starting point. Eligibility decisions are made by program \
                   offices. Call 2-1-1 anytime for free help navigating these applications."
            .to_string(),
    }
}

/// Handler exposing plan assembly.
pub struct PlanTool;

#[async_trait]
impl ToolHandler for PlanTool {
    fn spec(&self) -> &'static ToolSpec {
        &SPEC
    }

    async fn execute(&self, input: &Value) -> Result<Value, ToolError> {
        let empty = Vec::new();
        let programs = input["eligible_programs"].as_array().unwrap_or(&empty);
        let resources = input["local_resources"].as_array().unwrap_or(&empty);
        let situation = input["user_situation"].as_str().unwrap_or_default();

        let plan = build_action_plan(programs, resources, situation);
        serde_json::to_value(&plan).map_err(|e| ToolError::Handler(e.to_string()))
    }
}
