//! # Harness Configuration
//!
//! YAML fixture configuration for the acceptance harness.
//!
//! Scenarios never reach for ambient global state: the management node,
//! the managed-node list, connection settings, the orchestrator CLI binary
//! and plan-polling behavior are all resolved once from a `harness.yaml`
//! file and passed into each scenario explicitly.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod parser;

pub use parser::{parse_file, parse_str, substitute_env_vars};

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Environment variable not found
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Optional fixture name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The cluster under test
    pub cluster: Cluster,

    /// Orchestrator CLI settings
    #[serde(default)]
    pub cli: CliSettings,

    /// Plan polling settings
    #[serde(default)]
    pub plan: PlanSettings,
}

/// The cluster fixture: one management node plus the managed nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// The management node hostname (where the orchestrator CLI runs)
    pub management_node: String,

    /// Managed (peer) nodes in deployment order
    pub nodes: Vec<Node>,

    /// SSH connection settings shared by all nodes
    #[serde(default)]
    pub connection: Connection,
}

/// One managed node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Hostname used for command dispatch
    pub hostname: String,

    /// The node's path in the orchestrator model
    /// (e.g. `/deployments/site/clusters/c1/nodes/n1`)
    pub model_path: String,
}

/// SSH connection settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Connection {
    /// SSH user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// SSH port
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Path to the identity file (private key)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<String>,

    /// Extra arguments passed to every ssh invocation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
}

/// Orchestrator CLI settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliSettings {
    /// The orchestrator CLI binary name
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Per-command transport bound in seconds
    #[serde(default = "default_command_timeout")]
    pub command_timeout: u64,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            command_timeout: default_command_timeout(),
        }
    }
}

/// Plan polling settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSettings {
    /// Seconds between consecutive plan status polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Overall bound in seconds for a plan to reach its target state
    #[serde(default = "default_plan_timeout")]
    pub timeout: u64,

    /// Stop polling as soon as the plan reaches a terminal non-target state
    #[serde(default)]
    pub stop_on_terminal_failure: bool,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            timeout: default_plan_timeout(),
            stop_on_terminal_failure: false,
        }
    }
}

fn default_binary() -> String {
    "deployctl".to_string()
}

fn default_command_timeout() -> u64 {
    300
}

fn default_poll_interval() -> u64 {
    10
}

fn default_plan_timeout() -> u64 {
    1800
}
