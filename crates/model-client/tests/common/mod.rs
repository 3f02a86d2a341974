//! Shared test support: a replaying fake runner
#![allow(dead_code)]

use async_trait::async_trait;
use command_runner::{Command, CommandResult, Result, Runner};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Runner that replays canned results and records every dispatched command
///
/// Once the queue is exhausted the last response repeats, so polling tests
/// can observe a stable final state without sizing the queue exactly.
pub struct ReplayRunner {
    responses: Mutex<VecDeque<CommandResult>>,
    last: Mutex<Option<CommandResult>>,
    seen: Mutex<Vec<(String, String)>>,
}

impl ReplayRunner {
    pub fn new(responses: Vec<CommandResult>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// The `(host, command line)` pairs dispatched so far
    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Runner for ReplayRunner {
    async fn run(&self, host: &str, command: Command) -> Result<CommandResult> {
        self.seen
            .lock()
            .unwrap()
            .push((host.to_string(), command.display_line()));
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.responses.lock().unwrap().pop_front() {
            *last = Some(next);
        }
        Ok(last
            .clone()
            .unwrap_or_else(|| CommandResult::new(vec![], vec![], 0)))
    }
}

pub fn ok(stdout: &[&str]) -> CommandResult {
    CommandResult::new(stdout.iter().map(|s| s.to_string()).collect(), vec![], 0)
}

pub fn fail(exit_code: i32, stderr: &[&str]) -> CommandResult {
    CommandResult::new(vec![], stderr.iter().map(|s| s.to_string()).collect(), exit_code)
}

pub fn plan_status(state: &str) -> CommandResult {
    ok(&[&format!("Plan Status: {state}")])
}
