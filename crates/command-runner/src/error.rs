//! Error types for command execution

use std::time::Duration;
use thiserror::Error;

/// Unified error type for command execution
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to spawn a process
    #[error("failed to spawn process: {reason}")]
    SpawnFailed {
        /// The reason for the spawn failure
        reason: String,
    },

    /// The command did not finish within the transport bound
    #[error("command timed out after {timeout:?}: {command}")]
    Timeout {
        /// The configured bound that was exceeded
        timeout: Duration,
        /// The command that was killed
        command: String,
    },

    /// No connection settings are registered for the named host
    #[error("unknown host: {host}")]
    UnknownHost {
        /// The host name that could not be resolved
        host: String,
    },

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// For convenience, re-export specific error constructors
impl Error {
    /// Create a spawn failed error
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self::SpawnFailed {
            reason: reason.into(),
        }
    }

    /// Create a timeout error for the given command
    pub fn timeout(timeout: Duration, command: impl Into<String>) -> Self {
        Self::Timeout {
            timeout,
            command: command.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
