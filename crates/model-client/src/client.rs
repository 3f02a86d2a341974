//! CLI adapter: one operation per orchestrator verb

use std::sync::Arc;

use command_runner::{Command, CommandResult, Runner};
use tracing::debug;

use crate::path::ModelItemPath;
use crate::plan::PlanState;
use crate::{Error, Result};

/// Client for one host's orchestrator CLI
///
/// Every operation builds a single CLI invocation, dispatches it through
/// the configured [`Runner`], and returns the captured [`CommandResult`].
/// Strict operations treat a non-zero exit code as
/// [`Error::CommandFailed`]; the `*_expecting_failure` variants invert the
/// contract for negative-path scenarios and fail only when the command
/// unexpectedly succeeds.
#[derive(Clone)]
pub struct ModelClient {
    runner: Arc<dyn Runner>,
    host: String,
    binary: String,
}

impl ModelClient {
    /// Create a client for `host`, invoking `binary` as the orchestrator CLI
    pub fn new(runner: Arc<dyn Runner>, host: impl Into<String>, binary: impl Into<String>) -> Self {
        Self {
            runner,
            host: host.into(),
            binary: binary.into(),
        }
    }

    /// The host this client drives
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Create a model item at `path`
    pub async fn create(
        &self,
        path: &ModelItemPath,
        item_type: &str,
        properties: &[(&str, &str)],
    ) -> Result<CommandResult> {
        let cmd = self.create_command(path, item_type, properties);
        self.run_strict("create", cmd).await
    }

    /// Create a model item, expecting the orchestrator to reject it
    ///
    /// Returns the raw result for token inspection; an exit code of zero is
    /// an [`Error::UnexpectedSuccess`].
    pub async fn create_expecting_failure(
        &self,
        path: &ModelItemPath,
        item_type: &str,
        properties: &[(&str, &str)],
    ) -> Result<CommandResult> {
        let cmd = self.create_command(path, item_type, properties);
        self.run_expecting_failure("create", cmd).await
    }

    /// Link `target_path` to the definition at `source_path`
    pub async fn inherit(
        &self,
        target_path: &ModelItemPath,
        source_path: &ModelItemPath,
    ) -> Result<CommandResult> {
        let mut cmd = self.base_command();
        cmd.arg("inherit").arg(target_path.as_str()).arg(source_path.as_str());
        self.run_strict("inherit", cmd).await
    }

    /// Mark `path` for removal
    pub async fn remove(&self, path: &ModelItemPath) -> Result<CommandResult> {
        let mut cmd = self.base_command();
        cmd.arg("remove").arg(path.as_str());
        self.run_strict("remove", cmd).await
    }

    /// Serialize the subtree at `path` into `filename` on the host
    pub async fn export(&self, path: &ModelItemPath, filename: &str) -> Result<CommandResult> {
        let mut cmd = self.base_command();
        cmd.arg("export").arg(path.as_str()).arg(filename);
        self.run_strict("export", cmd).await
    }

    /// Deserialize `filename` into the subtree at `path`
    pub async fn load(&self, path: &ModelItemPath, filename: &str) -> Result<CommandResult> {
        let cmd = self.load_command(path, filename);
        self.run_strict("load", cmd).await
    }

    /// Load a file expecting the orchestrator to reject it
    ///
    /// Re-loading an already-existing item must fail with an "already
    /// exists" signal rather than silently succeeding, so a zero exit code
    /// here is an error.
    pub async fn load_expecting_failure(
        &self,
        path: &ModelItemPath,
        filename: &str,
    ) -> Result<CommandResult> {
        let cmd = self.load_command(path, filename);
        self.run_expecting_failure("load", cmd).await
    }

    /// Calculate a plan from pending model changes
    pub async fn create_plan(&self) -> Result<CommandResult> {
        let mut cmd = self.base_command();
        cmd.arg("create_plan");
        self.run_strict("create_plan", cmd).await
    }

    /// Request plan calculation, expecting validation to reject the model
    pub async fn create_plan_expecting_failure(&self) -> Result<CommandResult> {
        let mut cmd = self.base_command();
        cmd.arg("create_plan");
        self.run_expecting_failure("create_plan", cmd).await
    }

    /// Start executing the current plan
    pub async fn run_plan(&self) -> Result<CommandResult> {
        let mut cmd = self.base_command();
        cmd.arg("run_plan");
        self.run_strict("run_plan", cmd).await
    }

    /// Show the current plan
    pub async fn show_plan(&self) -> Result<CommandResult> {
        let mut cmd = self.base_command();
        cmd.arg("show_plan");
        self.run_strict("show_plan", cmd).await
    }

    /// Observe the current plan state
    ///
    /// A failing `show_plan` means no plan exists, which the poller treats
    /// as a waitable [`PlanState::NotRunning`] rather than an error.
    pub async fn plan_state(&self) -> Result<PlanState> {
        let mut cmd = self.base_command();
        cmd.arg("show_plan");
        let result = self.runner.run(&self.host, cmd).await?;
        if !result.success() {
            debug!(host = %self.host, %result, "show_plan failed, treating as no plan");
            return Ok(PlanState::NotRunning);
        }
        PlanState::parse_show_plan(result.stdout())
    }

    fn base_command(&self) -> Command {
        Command::new(&self.binary)
    }

    fn create_command(
        &self,
        path: &ModelItemPath,
        item_type: &str,
        properties: &[(&str, &str)],
    ) -> Command {
        let mut cmd = self.base_command();
        cmd.arg("create").arg(path.as_str()).arg(item_type);
        for (key, value) in properties {
            cmd.arg(format!("{key}={value}"));
        }
        cmd
    }

    fn load_command(&self, path: &ModelItemPath, filename: &str) -> Command {
        let mut cmd = self.base_command();
        cmd.arg("load").arg(path.as_str()).arg(filename);
        cmd
    }

    async fn run_strict(&self, verb: &'static str, cmd: Command) -> Result<CommandResult> {
        let result = self.runner.run(&self.host, cmd).await?;
        if !result.success() {
            return Err(Error::CommandFailed { verb, result });
        }
        Ok(result)
    }

    async fn run_expecting_failure(
        &self,
        verb: &'static str,
        cmd: Command,
    ) -> Result<CommandResult> {
        let result = self.runner.run(&self.host, cmd).await?;
        if result.success() {
            return Err(Error::UnexpectedSuccess { verb });
        }
        debug!(host = %self.host, verb, %result, "expected failure observed");
        Ok(result)
    }
}
