//! Core domain types shared across Compass crates.
//!
//! Profiles, programs, eligibility results, resources, action plans,
//! document insights, portal outcomes, and the session/turn model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Engine confidence band that a household actually qualifies.
///
/// Distinct from a strict boolean verdict. Ordered so that a likelihood can
/// be capped with `std::cmp::min` (Low < Medium < High).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Likelihood {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Likelihood::High => write!(f, "High"),
            Likelihood::Medium => write!(f, "Medium"),
            Likelihood::Low => write!(f, "Low"),
        }
    }
}

/// Employment status of the primary applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Retired,
    Disabled,
    Student,
}

impl EmploymentStatus {
    /// Parse the wire string used in tool inputs.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "employed" => Some(Self::Employed),
            "self_employed" => Some(Self::SelfEmployed),
            "unemployed" => Some(Self::Unemployed),
            "retired" => Some(Self::Retired),
            "disabled" => Some(Self::Disabled),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    /// True when the applicant has earned income (wages or self-employment).
    pub fn is_working(&self) -> bool {
        matches!(self, Self::Employed | Self::SelfEmployed)
    }
}

/// Special circumstances that widen or gate program eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Circumstance {
    Pregnant,
    Veteran,
    Homeless,
    HasYoungChildren,
}

impl Circumstance {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pregnant" => Some(Self::Pregnant),
            "veteran" => Some(Self::Veteran),
            "homeless" => Some(Self::Homeless),
            "has_young_children" | "infant_child" => Some(Self::HasYoungChildren),
            _ => None,
        }
    }
}

/// Structured facts about a household, accumulated across a conversation.
///
/// All fields are optional: the profile fills in as the user volunteers
/// facts or as tool outputs are merged. Merging never erases a known value
/// with an absent one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseholdProfile {
    /// Gross annual household income in dollars.
    pub annual_income: Option<f64>,
    /// Number of people in the household, including the applicant.
    pub household_size: Option<u32>,
    /// Two-letter state abbreviation (normalized from full names).
    pub state: Option<String>,
    /// Age of the primary applicant in years.
    pub age: Option<u32>,
    /// Whether the primary applicant has a disability.
    pub disabled: Option<bool>,
    /// Zip code, used for local resource lookup.
    pub zip_code: Option<String>,
    /// Employment status of the primary applicant.
    pub employment_status: Option<EmploymentStatus>,
    /// Applicable special circumstances.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub circumstances: Vec<Circumstance>,
}

impl HouseholdProfile {
    /// Merge newer facts into this profile.
    ///
    /// Later non-null values replace earlier ones; nulls never erase prior
    /// values. Circumstances accumulate as a set union.
    pub fn merge(&mut self, newer: &HouseholdProfile) {
        if newer.annual_income.is_some() {
            self.annual_income = newer.annual_income;
        }
        if newer.household_size.is_some() {
            self.household_size = newer.household_size;
        }
        if newer.state.is_some() {
            self.state = newer.state.clone();
        }
        if newer.age.is_some() {
            self.age = newer.age;
        }
        if newer.disabled.is_some() {
            self.disabled = newer.disabled;
        }
        if newer.zip_code.is_some() {
            self.zip_code = newer.zip_code.clone();
        }
        if newer.employment_status.is_some() {
            self.employment_status = newer.employment_status;
        }
        for c in &newer.circumstances {
            if !self.circumstances.contains(c) {
                self.circumstances.push(*c);
            }
        }
    }

    /// True when the profile carries a circumstance flag.
    pub fn has_circumstance(&self, c: Circumstance) -> bool {
        self.circumstances.contains(&c)
    }
}

/// One per-program judgment produced by the eligibility engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub program_id: String,
    pub name: String,
    pub short_name: String,
    pub category: String,
    pub likelihood: Likelihood,
    /// Income as a percentage of the governing threshold for this program.
    pub margin_pct: f64,
    pub estimated_value: String,
    pub reason: String,
    pub apply_url: String,
}

/// Full engine output for one evaluation: the per-program results plus the
/// derived summary figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityReport {
    pub results: Vec<EligibilityResult>,
    /// Household income as a percentage of the poverty guideline.
    pub income_pct_fpl: f64,
    /// The poverty guideline dollar figure for this household size.
    pub fpl_threshold: u32,
    /// Rough combined monthly value of the matched programs.
    pub estimated_monthly_value: u32,
    pub summary: String,
}

/// A community resource matched from the local directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub category: String,
    pub kind: String,
    pub services: Vec<String>,
    pub phone: String,
    pub website: String,
    pub hours: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_note: Option<String>,
}

/// An always-available helpline returned with every resource lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotline {
    pub name: String,
    pub description: String,
    pub contact: String,
    pub available: String,
    pub languages: String,
}

/// Urgency bucket for an action-plan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Immediate,
    ShortTerm,
    Ongoing,
}

/// One step in a personalized action plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    /// Stable key used for idempotent upsert (program id or a fixed slug).
    pub key: String,
    pub step: u32,
    pub title: String,
    pub description: String,
    pub action: String,
    pub urgency: Urgency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

/// A prioritized, step-by-step plan assembled from eligibility results and
/// local resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub title: String,
    pub situation: String,
    pub steps: Vec<ActionStep>,
    pub reminder: String,
}

impl ActionPlan {
    /// Steps in the given urgency bucket, in plan order.
    pub fn steps_with_urgency(&self, urgency: Urgency) -> Vec<&ActionStep> {
        self.steps.iter().filter(|s| s.urgency == urgency).collect()
    }

    /// Insert or replace steps by key, keeping step numbers sequential.
    pub fn upsert_steps(&mut self, incoming: &[ActionStep]) {
        for step in incoming {
            match self.steps.iter_mut().find(|s| s.key == step.key) {
                Some(existing) => *existing = step.clone(),
                None => self.steps.push(step.clone()),
            }
        }
        for (i, step) in self.steps.iter_mut().enumerate() {
            step.step = (i + 1) as u32;
        }
    }
}

/// Extraction confidence reported by the document vision collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Structured facts extracted from an uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInsights {
    pub detected_type: String,
    pub key_fields: serde_json::Value,
    pub annual_income_estimate: Option<f64>,
    #[serde(default)]
    pub relevant_programs: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    pub confidence: Confidence,
    pub summary: String,
}

/// Result of a portal-automation handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalStatus {
    /// The external driver completed the application steps.
    Completed,
    /// Automation unavailable; manual instructions were returned instead.
    Manual,
}

/// Recorded outcome of forwarding an application to the portal driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalOutcome {
    pub status: PortalStatus,
    pub program_id: String,
    pub program_name: String,
    pub apply_url: String,
    #[serde(default)]
    pub steps_completed: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub confirmation: String,
    pub message: String,
}

/// One tool invocation recorded in a turn's trace. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub name: String,
    pub input: serde_json::Value,
    pub output: serde_json::Value,
    pub elapsed_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// One user-message/assistant-response cycle, with its tool-call trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub user_message: String,
    pub assistant_message: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRecord>,
    /// True when the tool-call cap forced a best-effort final response.
    #[serde(default)]
    pub truncated: bool,
    pub created_at: DateTime<Utc>,
}

/// Durable conversation state keyed by an opaque session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub turns: Vec<Turn>,
    pub profile: HouseholdProfile,
    pub results: Vec<EligibilityResult>,
    pub resources: Vec<Resource>,
    pub plan: Option<ActionPlan>,
    pub document: Option<DocumentInsights>,
    pub portal: Option<PortalOutcome>,
}

impl Session {
    /// Create an empty session with the given id.
    pub fn new(id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            turns: Vec::new(),
            profile: HouseholdProfile::default(),
            results: Vec::new(),
            resources: Vec::new(),
            plan: None,
            document: None,
            portal: None,
        }
    }

    /// Structured session payload returned alongside chat responses.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            eligible_programs: self.results.clone(),
            local_resources: self.resources.clone(),
            action_plan: self.plan.clone(),
            document_analysis: self.document.clone(),
            has_results: !self.results.is_empty(),
        }
    }
}

/// The structured slice of a session surfaced to callers on every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub eligible_programs: Vec<EligibilityResult>,
    pub local_resources: Vec<Resource>,
    pub action_plan: Option<ActionPlan>,
    pub document_analysis: Option<DocumentInsights>,
    pub has_results: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(key: &str, urgency: Urgency) -> ActionStep {
        ActionStep {
            key: key.to_string(),
            step: 0,
            title: format!("Step {}", key),
            description: String::new(),
            action: String::new(),
            urgency,
            program_id: None,
            timeline: None,
        }
    }

    // ---- Likelihood ----

    #[test]
    fn test_likelihood_ordering() {
        assert!(Likelihood::High > Likelihood::Medium);
        assert!(Likelihood::Medium > Likelihood::Low);
        assert_eq!(
            std::cmp::min(Likelihood::High, Likelihood::Medium),
            Likelihood::Medium
        );
    }

    #[test]
    fn test_likelihood_display() {
        assert_eq!(Likelihood::High.to_string(), "High");
        assert_eq!(Likelihood::Medium.to_string(), "Medium");
        assert_eq!(Likelihood::Low.to_string(), "Low");
    }

    // ---- EmploymentStatus ----

    #[test]
    fn test_employment_parse() {
        assert_eq!(
            EmploymentStatus::parse("self_employed"),
            Some(EmploymentStatus::SelfEmployed)
        );
        assert_eq!(EmploymentStatus::parse("gig_worker"), None);
    }

    #[test]
    fn test_employment_is_working() {
        assert!(EmploymentStatus::Employed.is_working());
        assert!(EmploymentStatus::SelfEmployed.is_working());
        assert!(!EmploymentStatus::Retired.is_working());
        assert!(!EmploymentStatus::Unemployed.is_working());
    }

    // ---- Circumstance ----

    #[test]
    fn test_circumstance_parse_aliases() {
        assert_eq!(
            Circumstance::parse("infant_child"),
            Some(Circumstance::HasYoungChildren)
        );
        assert_eq!(
            Circumstance::parse("has_young_children"),
            Some(Circumstance::HasYoungChildren)
        );
        assert_eq!(Circumstance::parse("unknown"), None);
    }

    // ---- Profile merge ----

    #[test]
    fn test_profile_merge_newer_wins() {
        let mut base = HouseholdProfile {
            annual_income: Some(20_000.0),
            household_size: Some(2),
            ..HouseholdProfile::default()
        };
        let newer = HouseholdProfile {
            annual_income: Some(24_000.0),
            state: Some("CA".to_string()),
            ..HouseholdProfile::default()
        };
        base.merge(&newer);
        assert_eq!(base.annual_income, Some(24_000.0));
        assert_eq!(base.household_size, Some(2));
        assert_eq!(base.state.as_deref(), Some("CA"));
    }

    #[test]
    fn test_profile_merge_null_does_not_erase() {
        let mut base = HouseholdProfile {
            annual_income: Some(20_000.0),
            age: Some(35),
            disabled: Some(true),
            ..HouseholdProfile::default()
        };
        base.merge(&HouseholdProfile::default());
        assert_eq!(base.annual_income, Some(20_000.0));
        assert_eq!(base.age, Some(35));
        assert_eq!(base.disabled, Some(true));
    }

    #[test]
    fn test_profile_merge_circumstances_union() {
        let mut base = HouseholdProfile {
            circumstances: vec![Circumstance::Pregnant],
            ..HouseholdProfile::default()
        };
        let newer = HouseholdProfile {
            circumstances: vec![Circumstance::Pregnant, Circumstance::Homeless],
            ..HouseholdProfile::default()
        };
        base.merge(&newer);
        assert_eq!(base.circumstances.len(), 2);
        assert!(base.has_circumstance(Circumstance::Homeless));
    }

    #[test]
    fn test_profile_merge_idempotent() {
        let mut base = HouseholdProfile::default();
        let newer = HouseholdProfile {
            annual_income: Some(18_000.0),
            circumstances: vec![Circumstance::Veteran],
            ..HouseholdProfile::default()
        };
        base.merge(&newer);
        let after_once = base.clone();
        base.merge(&newer);
        assert_eq!(base, after_once);
    }

    // ---- ActionPlan upsert ----

    #[test]
    fn test_plan_upsert_inserts_and_renumbers() {
        let mut plan = ActionPlan {
            title: "Plan".to_string(),
            situation: String::new(),
            steps: vec![step("a", Urgency::Immediate)],
            reminder: String::new(),
        };
        plan.upsert_steps(&[step("b", Urgency::ShortTerm), step("c", Urgency::Ongoing)]);
        assert_eq!(plan.steps.len(), 3);
        assert_eq!(plan.steps[0].step, 1);
        assert_eq!(plan.steps[2].step, 3);
    }

    #[test]
    fn test_plan_upsert_replaces_by_key() {
        let mut plan = ActionPlan {
            title: "Plan".to_string(),
            situation: String::new(),
            steps: vec![step("a", Urgency::Immediate), step("b", Urgency::Ongoing)],
            reminder: String::new(),
        };
        let mut replacement = step("a", Urgency::Immediate);
        replacement.title = "Updated".to_string();
        plan.upsert_steps(&[replacement]);
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].title, "Updated");
    }

    #[test]
    fn test_plan_upsert_idempotent() {
        let mut plan = ActionPlan {
            title: "Plan".to_string(),
            situation: String::new(),
            steps: vec![],
            reminder: String::new(),
        };
        let incoming = vec![step("x", Urgency::ShortTerm), step("y", Urgency::Ongoing)];
        plan.upsert_steps(&incoming);
        plan.upsert_steps(&incoming);
        assert_eq!(plan.steps.len(), 2);
    }

    #[test]
    fn test_plan_steps_with_urgency() {
        let plan = ActionPlan {
            title: "Plan".to_string(),
            situation: String::new(),
            steps: vec![
                step("a", Urgency::Immediate),
                step("b", Urgency::ShortTerm),
                step("c", Urgency::ShortTerm),
            ],
            reminder: String::new(),
        };
        assert_eq!(plan.steps_with_urgency(Urgency::ShortTerm).len(), 2);
        assert_eq!(plan.steps_with_urgency(Urgency::Ongoing).len(), 0);
    }

    // ---- Session ----

    #[test]
    fn test_session_new_is_empty() {
        let session = Session::new("abc".to_string(), Utc::now());
        assert_eq!(session.id, "abc");
        assert!(session.turns.is_empty());
        assert!(session.results.is_empty());
        assert!(session.plan.is_none());
    }

    #[test]
    fn test_snapshot_has_results_flag() {
        let mut session = Session::new("abc".to_string(), Utc::now());
        assert!(!session.snapshot().has_results);
        session.results.push(EligibilityResult {
            program_id: "snap".to_string(),
            name: "SNAP".to_string(),
            short_name: "SNAP".to_string(),
            category: "food".to_string(),
            likelihood: Likelihood::High,
            margin_pct: 90.0,
            estimated_value: "~$300/month".to_string(),
            reason: "Income within limit".to_string(),
            apply_url: String::new(),
        });
        assert!(session.snapshot().has_results);
    }

    // ---- Serde wire shapes ----

    #[test]
    fn test_employment_serde_snake_case() {
        let json = serde_json::to_string(&EmploymentStatus::SelfEmployed).unwrap();
        assert_eq!(json, "\"self_employed\"");
    }

    #[test]
    fn test_confidence_serde_lowercase() {
        let json = serde_json::to_string(&Confidence::High).unwrap();
        assert_eq!(json, "\"high\"");
        let parsed: Confidence = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, Confidence::Medium);
    }

    #[test]
    fn test_session_roundtrip() {
        let session = Session::new("s1".to_string(), Utc::now());
        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }
}
