//! Compass core crate - shared types, configuration, and errors.
//!
//! Holds the domain model (household profiles, programs, eligibility
//! results, sessions, turns), the top-level `CompassError`, the TOML
//! configuration, and the session merge policy used by the store and
//! the agent.

pub mod config;
pub mod error;
pub mod session;
pub mod types;
