//! Local process execution backend

use async_io::Timer;
use async_process::Stdio;
use async_trait::async_trait;
use futures_lite::io::{AsyncBufReadExt, BufReader};
use futures_lite::stream::StreamExt;
use futures_lite::{future, io::AsyncRead};
use std::time::Duration;
use tracing::{debug, trace};

use crate::command::Command;
use crate::error::{Error, Result};
use crate::output::CommandResult;
use crate::runner::Runner;

/// Default transport bound for a single command
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Runner that executes processes on the local machine
///
/// The host argument to [`Runner::run`] is recorded in logs only; the
/// process always runs locally. This is the backend used when the harness
/// runs on the management node itself, and the transport underneath
/// [`SshRunner`](crate::SshRunner).
#[derive(Debug, Clone)]
pub struct LocalRunner {
    timeout: Duration,
}

impl LocalRunner {
    /// Create a runner with the default timeout
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a runner with a specific transport bound
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The configured transport bound
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for LocalRunner {
    fn default() -> Self {
        Self::new()
    }
}

enum Outcome {
    Finished(Result<CommandResult>),
    TimedOut,
}

#[async_trait]
impl Runner for LocalRunner {
    async fn run(&self, host: &str, command: Command) -> Result<CommandResult> {
        debug!(host, command = %command.display_line(), "running command");

        let mut async_cmd = command.prepare();
        async_cmd.stdout(Stdio::piped());
        async_cmd.stderr(Stdio::piped());
        async_cmd.stdin(Stdio::null());

        let mut child = async_cmd
            .spawn()
            .map_err(|e| Error::spawn_failed(format!("{}: {}", command.display_line(), e)))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let collect = async {
            let (out, err) = future::zip(read_lines(stdout), read_lines(stderr)).await;
            let status = child.status().await?;
            let exit_code = status.code().unwrap_or(-1);
            Ok(CommandResult::new(out?, err?, exit_code))
        };
        let deadline = async {
            Timer::after(self.timeout).await;
            Outcome::TimedOut
        };

        let outcome = future::or(async { Outcome::Finished(collect.await) }, deadline).await;
        match outcome {
            Outcome::Finished(result) => {
                if let Ok(result) = &result {
                    trace!(
                        host,
                        exit_code = result.exit_code(),
                        stdout_lines = result.stdout().len(),
                        stderr_lines = result.stderr().len(),
                        "command finished"
                    );
                }
                result
            }
            Outcome::TimedOut => {
                // The child is still running; a timed-out command must not
                // linger and keep the remote side busy.
                let _ = child.kill();
                Err(Error::timeout(self.timeout, command.display_line()))
            }
        }
    }
}

async fn read_lines<R: AsyncRead + Unpin>(reader: Option<R>) -> std::io::Result<Vec<String>> {
    let mut collected = Vec::new();
    if let Some(reader) = reader {
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next().await {
            collected.push(line?);
        }
    }
    Ok(collected)
}
