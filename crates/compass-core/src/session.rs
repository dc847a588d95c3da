//! Session merge policy.
//!
//! A completed turn is condensed into a `TurnDelta` and applied to the
//! session by the store under the per-session write lock. The merge rules:
//! eligibility results replace the prior set wholesale, resources and plan
//! steps upsert on a stable key, and the profile merges field-by-field
//! preferring newer non-null values. Applying the same delta twice must not
//! duplicate entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    ActionPlan, DocumentInsights, EligibilityResult, HouseholdProfile, PortalOutcome, Resource,
    Session, Turn,
};

/// Everything a finished turn contributes to its session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnDelta {
    /// The completed turn (messages plus tool-call trace). Absent for
    /// non-conversational mutations such as a portal handoff.
    pub turn: Option<Turn>,
    /// Facts extracted during the turn, merged non-null-wins.
    pub profile: HouseholdProfile,
    /// A fresh eligibility evaluation. Replaces the prior result set; the
    /// engine is deterministic and cheap to rerun.
    pub results: Option<Vec<EligibilityResult>>,
    /// Resources discovered this turn, upserted by name.
    pub resources: Vec<Resource>,
    /// A new or updated action plan. Steps upsert into any existing plan.
    pub plan: Option<ActionPlan>,
    /// Document analysis produced this turn.
    pub document: Option<DocumentInsights>,
    /// Portal handoff outcome recorded this turn.
    pub portal: Option<PortalOutcome>,
}

impl TurnDelta {
    /// Apply this delta to a session in place.
    pub fn apply(&self, session: &mut Session, now: DateTime<Utc>) {
        if let Some(turn) = &self.turn {
            session.turns.push(turn.clone());
        }

        session.profile.merge(&self.profile);

        if let Some(results) = &self.results {
            session.results = results.clone();
        }

        for resource in &self.resources {
            match session
                .resources
                .iter_mut()
                .find(|r| r.name == resource.name)
            {
                Some(existing) => *existing = resource.clone(),
                None => session.resources.push(resource.clone()),
            }
        }

        if let Some(plan) = &self.plan {
            match &mut session.plan {
                Some(existing) => {
                    existing.title = plan.title.clone();
                    existing.situation = plan.situation.clone();
                    existing.reminder = plan.reminder.clone();
                    existing.upsert_steps(&plan.steps);
                }
                None => session.plan = Some(plan.clone()),
            }
        }

        if self.document.is_some() {
            session.document = self.document.clone();
        }

        if self.portal.is_some() {
            session.portal = self.portal.clone();
        }

        session.updated_at = now;
    }
}
