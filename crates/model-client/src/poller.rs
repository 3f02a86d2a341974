//! Plan status polling with timeout

use std::time::{Duration, Instant};

use async_io::Timer;
use tracing::{debug, warn};

use crate::client::ModelClient;
use crate::plan::PlanState;
use crate::Result;

/// Polling behavior for [`PlanPoller`]
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between consecutive `show_plan` invocations
    pub interval: Duration,
    /// Give up as soon as a terminal state other than the target is seen
    ///
    /// Off by default: the observed product behavior is to keep polling
    /// until the timeout even when the plan has already failed.
    pub stop_on_terminal_failure: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            stop_on_terminal_failure: false,
        }
    }
}

/// Polls plan status until a target state is observed or a timeout elapses
pub struct PlanPoller<'a> {
    client: &'a ModelClient,
    config: PollConfig,
}

impl<'a> PlanPoller<'a> {
    /// Create a poller over `client`
    pub fn new(client: &'a ModelClient, config: PollConfig) -> Self {
        Self { client, config }
    }

    /// Wait until the plan reaches `target` or `timeout` elapses
    ///
    /// Returns `Ok(true)` when the target state is observed and `Ok(false)`
    /// on timeout; a timeout never raises. The caller decides whether a
    /// timeout is fatal. Transport failures still propagate as errors.
    pub async fn wait_for_state(&self, target: PlanState, timeout: Duration) -> Result<bool> {
        let started = Instant::now();

        loop {
            let state = self.client.plan_state().await?;
            debug!(host = self.client.host(), %state, %target, "polled plan state");

            if state == target {
                return Ok(true);
            }

            if self.config.stop_on_terminal_failure && state.is_terminal() {
                warn!(
                    host = self.client.host(),
                    %state,
                    %target,
                    "plan reached a terminal state that is not the target"
                );
                return Ok(false);
            }

            if started.elapsed() >= timeout {
                warn!(
                    host = self.client.host(),
                    %target,
                    ?timeout,
                    "timed out waiting for plan state"
                );
                return Ok(false);
            }

            Timer::after(self.config.interval).await;
        }
    }
}
