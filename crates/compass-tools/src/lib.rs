//! Compass tools crate - schema-validated capability handlers.
//!
//! Defines the `ToolHandler` trait and `ToolRegistry`, plus the four tools
//! the orchestrator exposes to the model: eligibility evaluation, local
//! resource lookup, document analysis, and action-plan assembly.

pub mod document;
pub mod eligibility;
pub mod error;
pub mod plan;
pub mod registry;
pub mod resources;

use std::sync::Arc;

use compass_engine::{EngineParams, ReferenceTables};
use compass_inference::DocumentVision;

pub use document::DocumentTool;
pub use eligibility::{profile_from_input, EligibilityTool};
pub use error::ToolError;
pub use plan::PlanTool;
pub use registry::{ParamKind, ParamSpec, ToolHandler, ToolOutcome, ToolRegistry, ToolSpec};
pub use resources::ResourceTool;

/// Build a registry with every built-in tool registered.
pub fn builtin_registry(
    tables: &'static ReferenceTables,
    engine_params: EngineParams,
    vision: Arc<dyn DocumentVision>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(EligibilityTool::new(tables, engine_params)));
    registry.register(Arc::new(ResourceTool));
    registry.register(Arc::new(DocumentTool::new(vision)));
    registry.register(Arc::new(PlanTool));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_inference::NoVision;

    #[test]
    fn test_builtin_registry_has_four_tools() {
        let registry = builtin_registry(
            ReferenceTables::default_2024(),
            EngineParams::default(),
            Arc::new(NoVision),
        );
        let names: Vec<String> = registry.specs().iter().map(|d| d.name.clone()).collect();
        assert_eq!(names.len(), 4);
        for name in [
            "check_benefit_eligibility",
            "find_local_resources",
            "analyze_document",
            "create_action_plan",
        ] {
            assert!(names.iter().any(|n| n == name), "missing tool {}", name);
        }
    }
}
