//! Portal-automation handoff.
//!
//! The core only forwards an application request to the external
//! browser-automation driver and records the outcome; it never drives a
//! browser itself. Without a configured driver, the fallback returns
//! manual instructions with the program's apply URL.

use async_trait::async_trait;
use uuid::Uuid;

use compass_core::types::{HouseholdProfile, PortalOutcome, PortalStatus};

use crate::error::AgentError;

/// A request forwarded to the portal driver.
#[derive(Debug, Clone)]
pub struct PortalRequest {
    pub session_id: String,
    pub program_id: String,
    pub program_name: String,
    pub apply_url: String,
    pub profile: HouseholdProfile,
}

/// External browser-automation collaborator.
#[async_trait]
pub trait PortalDriver: Send + Sync {
    async fn drive(&self, request: &PortalRequest) -> Result<PortalOutcome, AgentError>;
}

/// Fallback driver: returns manual application instructions.
pub struct ManualFallbackDriver;

#[async_trait]
impl PortalDriver for ManualFallbackDriver {
    async fn drive(&self, request: &PortalRequest) -> Result<PortalOutcome, AgentError> {
        Ok(PortalOutcome {
            status: PortalStatus::Manual,
            program_id: request.program_id.clone(),
            program_name: request.program_name.clone(),
            apply_url: request.apply_url.clone(),
            steps_completed: Vec::new(),
            instructions: vec![
                "Go to the application portal".to_string(),
                "Click 'Apply' or 'Get Started'".to_string(),
                "Complete the application with your household information".to_string(),
                "Upload required documents (ID, pay stubs, proof of address)".to_string(),
                "Submit and note your confirmation number".to_string(),
            ],
            confirmation: reference_number(),
            message: format!(
                "Automated filing is not available. Please apply manually for {}.",
                request.program_name
            ),
        })
    }
}

/// A `COMPASS-`-prefixed reference number for tracking the handoff.
fn reference_number() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("COMPASS-{}", hex[..8].to_uppercase())
}
