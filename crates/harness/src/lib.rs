//! Scenario library for the deployment acceptance harness
//!
//! The binary front-end lives in `main.rs`; everything it drives is
//! exported from here so the scenario tests can run the exact same code
//! against the orchestrator double.

#![warn(missing_docs)]

pub mod scenarios;

pub use scenarios::{run_scenario, Scenario, SCENARIOS};
