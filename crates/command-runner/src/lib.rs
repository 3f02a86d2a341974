//! Single-shot command execution with captured output
//!
//! This crate provides the transport layer of the acceptance harness: run a
//! command on a named host, wait for it to finish, and hand back everything
//! it printed together with its exit code. Execution is a single attempt
//! with a hard timeout; callers decide whether a failure was expected.

#![warn(missing_docs)]

pub mod backends;
pub mod command;
pub mod error;
pub mod output;
pub mod runner;

pub use backends::local::LocalRunner;
pub use backends::ssh::{SshConfig, SshRunner};
pub use command::Command;
pub use error::{Error, Result};
pub use output::CommandResult;
pub use runner::Runner;
