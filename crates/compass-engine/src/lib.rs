//! Compass eligibility engine crate - pure rule evaluation.
//!
//! Given a household profile and versioned reference tables (poverty
//! guidelines, area median income, expansion-state membership), produces a
//! deterministic set of per-program eligibility judgments. No I/O, no
//! shared mutable state, no async.

pub mod engine;
pub mod error;
pub mod programs;
pub mod tables;
pub mod values;

pub use engine::{evaluate, EngineParams};
pub use error::EngineError;
pub use programs::{catalog, program_by_id, Gate, Program, ProgramRule};
pub use tables::{normalize_state, AmiTable, PovertyGuidelines, ReferenceTables};
