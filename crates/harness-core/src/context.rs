//! Scenario fixtures, resolved once and passed in explicitly

use std::sync::Arc;
use std::time::Duration;

use command_runner::Runner;
use harness_config::{Config, Node};
use model_client::{ModelClient, PlanPoller, PlanState, PollConfig};

use crate::{Error, Result};

/// Everything a scenario needs to drive the cluster under test
///
/// The management node, the managed-node list and the polling settings come
/// from the harness configuration; the runner decides how commands reach
/// the hosts (SSH for a real cluster, the scripted double in tests). There
/// is no ambient global state: a scenario receives its context and nothing
/// else.
#[derive(Clone)]
pub struct ScenarioContext {
    config: Config,
    runner: Arc<dyn Runner>,
}

impl ScenarioContext {
    /// Bundle `config` and `runner` into a context
    pub fn new(config: Config, runner: Arc<dyn Runner>) -> Self {
        Self { config, runner }
    }

    /// The harness configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shared runner
    pub fn runner(&self) -> &Arc<dyn Runner> {
        &self.runner
    }

    /// The management node hostname
    pub fn management_node(&self) -> &str {
        &self.config.cluster.management_node
    }

    /// The managed nodes, in deployment order
    pub fn nodes(&self) -> &[Node] {
        &self.config.cluster.nodes
    }

    /// A model client bound to the management node
    pub fn management_client(&self) -> ModelClient {
        ModelClient::new(
            self.runner.clone(),
            self.config.cluster.management_node.clone(),
            self.config.cli.binary.clone(),
        )
    }

    /// Polling behavior from the plan settings
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.config.plan.poll_interval),
            stop_on_terminal_failure: self.config.plan.stop_on_terminal_failure,
        }
    }

    /// The configured bound for a plan to reach its target state
    pub fn plan_timeout(&self) -> Duration {
        Duration::from_secs(self.config.plan.timeout)
    }

    /// Wait for the current plan to reach `target`
    ///
    /// The poller's timeout is reported as [`Error::PlanTimeout`]; the
    /// scenarios treat a plan that never arrives as fatal.
    pub async fn wait_for_plan(&self, target: PlanState) -> Result<()> {
        let client = self.management_client();
        let poller = PlanPoller::new(&client, self.poll_config());
        let timeout = self.plan_timeout();
        if poller.wait_for_state(target, timeout).await? {
            Ok(())
        } else {
            Err(Error::PlanTimeout { target, timeout })
        }
    }
}
