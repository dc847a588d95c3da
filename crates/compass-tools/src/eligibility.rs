//! Eligibility evaluation tool.
//!
//! Wraps the rule engine as a schema-validated capability. The handler is
//! pure: it parses the model-provided facts into a profile, evaluates, and
//! returns the report.

use async_trait::async_trait;
use serde_json::Value;

use compass_core::types::{Circumstance, EmploymentStatus, HouseholdProfile};
use compass_engine::{evaluate, EngineError, EngineParams, ReferenceTables};

use crate::error::ToolError;
use crate::registry::{ParamKind, ParamSpec, ToolHandler, ToolSpec};

static SPEC: ToolSpec = ToolSpec {
    name: "check_benefit_eligibility",
    description: "Check which government benefit programs (SNAP, Medicaid, TANF, SSI, EITC, \
                  Section 8, and others) a person likely qualifies for based on their income, \
                  household size, state, age, and circumstances. Call once you have gathered \
                  enough information.",
    params: &[
        ParamSpec {
            name: "annual_income",
            kind: ParamKind::Number,
            required: true,
            non_negative: true,
            description: "Gross annual household income in US dollars. If monthly income is \
                          given, multiply by 12.",
        },
        ParamSpec {
            name: "household_size",
            kind: ParamKind::Integer,
            required: true,
            non_negative: true,
            description: "Total number of people in the household including the applicant.",
        },
        ParamSpec {
            name: "state",
            kind: ParamKind::String,
            required: false,
            non_negative: false,
            description: "US state name or two-letter abbreviation (e.g., 'CA' or 'California').",
        },
        ParamSpec {
            name: "age",
            kind: ParamKind::Integer,
            required: false,
            non_negative: true,
            description: "Age of the primary applicant in years.",
        },
        ParamSpec {
            name: "disabled",
            kind: ParamKind::Boolean,
            required: false,
            non_negative: false,
            description: "Whether the primary applicant has a disability.",
        },
        ParamSpec {
            name: "zip_code",
            kind: ParamKind::String,
            required: false,
            non_negative: false,
            description: "Zip code, used later for local resource lookup.",
        },
        ParamSpec {
            name: "employment_status",
            kind: ParamKind::String,
            required: false,
            non_negative: false,
            description: "One of: employed, self_employed, unemployed, retired, disabled, student.",
        },
        ParamSpec {
            name: "special_circumstances",
            kind: ParamKind::StringArray,
            required: false,
            non_negative: false,
            description: "Applicable circumstances: 'pregnant', 'veteran', 'homeless', \
                          'has_young_children'. Leave empty if none.",
        },
    ],
};

/// Parse tool input fields into a profile patch.
///
/// Unknown circumstance and employment strings are ignored rather than
/// rejected; the schema has already type-checked the input.
pub fn profile_from_input(input: &Value) -> HouseholdProfile {
    let circumstances = input["special_circumstances"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str())
                .filter_map(Circumstance::parse)
                .collect()
        })
        .unwrap_or_default();

    HouseholdProfile {
        annual_income: input["annual_income"].as_f64(),
        household_size: input["household_size"].as_u64().map(|n| n as u32),
        state: input["state"].as_str().map(|s| s.to_string()),
        age: input["age"].as_u64().map(|n| n as u32),
        disabled: input["disabled"].as_bool(),
        zip_code: input["zip_code"].as_str().map(|s| s.to_string()),
        employment_status: input["employment_status"]
            .as_str()
            .and_then(EmploymentStatus::parse),
        circumstances,
    }
}

/// Handler wrapping the eligibility engine.
pub struct EligibilityTool {
    tables: &'static ReferenceTables,
    params: EngineParams,
}

impl EligibilityTool {
    pub fn new(tables: &'static ReferenceTables, params: EngineParams) -> Self {
        Self { tables, params }
    }
}

#[async_trait]
impl ToolHandler for EligibilityTool {
    fn spec(&self) -> &'static ToolSpec {
        &SPEC
    }

    async fn execute(&self, input: &Value) -> Result<Value, ToolError> {
        let profile = profile_from_input(input);
        let report = evaluate(&profile, self.tables, &self.params).map_err(|e| match e {
            EngineError::MissingField(_)
            | EngineError::InvalidHouseholdSize
            | EngineError::NegativeIncome(_) => ToolError::InvalidInput(e.to_string()),
            EngineError::UnknownYear(_) => ToolError::Handler(e.to_string()),
        })?;
        serde_json::to_value(&report).map_err(|e| ToolError::Handler(e.to_string()))
    }
}
