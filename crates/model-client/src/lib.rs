//! # Model Client
//!
//! Typed client for the deployment orchestrator's command-line interface.
//!
//! The orchestrator exposes its configuration model and deployment plans
//! through CLI verbs (`create`, `inherit`, `remove`, `export`, `load`,
//! `create_plan`, `run_plan`, `show_plan`). This crate builds those
//! invocations from structured parameters, dispatches them through a
//! [`Runner`](command_runner::Runner), and interprets the captured results
//! either strictly (non-zero exit aborts) or tolerantly (the raw result is
//! returned for negative-path inspection).
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use command_runner::LocalRunner;
//! use model_client::{ModelClient, ModelItemPath, PlanPoller, PlanState, PollConfig};
//!
//! # async fn example() -> Result<(), model_client::Error> {
//! let runner = Arc::new(LocalRunner::new());
//! let client = ModelClient::new(runner, "ms1", "deployctl");
//!
//! let path = ModelItemPath::new("/software/services/vsftpd");
//! client.create(&path, "service", &[("service_name", "vsftpd")]).await?;
//! client.create_plan().await?;
//! client.run_plan().await?;
//!
//! let poller = PlanPoller::new(&client, PollConfig::default());
//! let done = poller
//!     .wait_for_state(PlanState::Complete, std::time::Duration::from_secs(600))
//!     .await?;
//! assert!(done);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod path;
mod plan;
mod poller;

pub use client::ModelClient;
pub use path::ModelItemPath;
pub use plan::PlanState;
pub use poller::{PlanPoller, PollConfig};

use command_runner::CommandResult;

/// Error types for model client operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Command runner (transport) errors
    #[error("command execution error: {0}")]
    Runner(#[from] command_runner::Error),

    /// A strict operation returned a non-zero exit code
    #[error("{verb} failed: {result}")]
    CommandFailed {
        /// The orchestrator verb that failed
        verb: &'static str,
        /// The captured output of the failed invocation
        result: CommandResult,
    },

    /// An operation invoked in expected-failure mode exited zero
    #[error("{verb} succeeded but a failure was expected")]
    UnexpectedSuccess {
        /// The orchestrator verb that unexpectedly succeeded
        verb: &'static str,
    },

    /// Plan status output did not contain a recognizable state
    #[error("unrecognized plan state in show_plan output: {0:?}")]
    UnknownPlanState(String),
}

/// Result type for model client operations
pub type Result<T> = std::result::Result<T, Error>;
