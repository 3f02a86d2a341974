//! Captured output of a completed command

use std::fmt;

/// Everything a finished command produced
///
/// Immutable once constructed. Output is split into lines in arrival order,
/// matching how the assertion helpers consume it. A process killed by a
/// signal reports exit code -1; the orchestrator under test always exits
/// with a real code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    stdout: Vec<String>,
    stderr: Vec<String>,
    exit_code: i32,
}

impl CommandResult {
    /// Create a result from captured output
    pub fn new(stdout: Vec<String>, stderr: Vec<String>, exit_code: i32) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
        }
    }

    /// Captured stdout lines, in order
    pub fn stdout(&self) -> &[String] {
        &self.stdout
    }

    /// Captured stderr lines, in order
    pub fn stderr(&self) -> &[String] {
        &self.stderr
    }

    /// The process exit code
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Returns true if the command exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exit code {}", self.exit_code)?;
        if let Some(first) = self.stderr.first() {
            write!(f, ", stderr: {first}")?;
            if self.stderr.len() > 1 {
                write!(f, " (+{} more lines)", self.stderr.len() - 1)?;
            }
        }
        Ok(())
    }
}
