//! # Harness Core
//!
//! Shared building blocks for acceptance scenarios: assertion helpers,
//! table-driven service status probes, XML well-formedness checks, the
//! scenario fixture context and step trace, and (behind the `test-utils`
//! feature) an in-memory orchestrator double.

#![warn(missing_docs)]

pub mod assertions;
pub mod context;
pub mod scenario;
pub mod service_manager;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod xml;

pub use assertions::{expect_error_token, is_text_in_list, require_text_in_list, tokens};
pub use context::ScenarioContext;
pub use scenario::{ScenarioStep, StepTrace};
pub use service_manager::{probe_service, ServiceManager, ServiceProbe};

use command_runner::CommandResult;
use model_client::PlanState;
use std::time::Duration;

/// Error types for scenario execution
///
/// Covers the harness failure taxonomy: expected failures that did not
/// materialize, unexpected command failures (carried inside the
/// [`model_client::Error`] variant with the captured output), plan
/// timeouts, and assertion mismatches. All are terminal for the current
/// scenario; nothing here is retried.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Command runner (transport) errors
    #[error("command execution error: {0}")]
    Runner(#[from] command_runner::Error),

    /// Model client errors, including strict-mode command failures
    #[error("model client error: {0}")]
    Client(#[from] model_client::Error),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] harness_config::ConfigError),

    /// An expected error token never appeared in stderr
    #[error("expected '{token}' in stderr, got: {result}")]
    ExpectedFailureMissing {
        /// The token that was required
        token: String,
        /// The captured output that lacked it
        result: CommandResult,
    },

    /// The plan did not reach the awaited state in time
    #[error("plan did not reach {target} within {timeout:?}")]
    PlanTimeout {
        /// The awaited state
        target: PlanState,
        /// The bound that elapsed
        timeout: Duration,
    },

    /// An assertion helper mismatch
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// A service probe observed the wrong state
    #[error("service '{service}' on {host}: expected {expected}, found {actual}")]
    ServiceState {
        /// Host that was probed
        host: String,
        /// Service that was probed
        service: String,
        /// The state the scenario required
        expected: &'static str,
        /// The state the probe observed
        actual: ServiceProbe,
    },
}

/// Result type for scenario operations
pub type Result<T> = std::result::Result<T, Error>;
