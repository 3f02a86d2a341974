//! The runner trait implemented by every execution backend

use async_trait::async_trait;

use crate::command::Command;
use crate::error::Result;
use crate::output::CommandResult;

/// Executes a command on a named host and captures its output
///
/// A runner makes exactly one attempt per call: no retries, no queueing.
/// A non-zero exit code is not an error at this layer; only transport
/// problems (spawn failure, timeout, unknown host) produce `Err`.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Run `command` on `host`, wait for it to finish, and capture its output
    async fn run(&self, host: &str, command: Command) -> Result<CommandResult>;
}
