//! SSH remote execution backend using the ssh CLI

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::backends::local::LocalRunner;
use crate::command::Command;
use crate::error::{Error, Result};
use crate::output::CommandResult;
use crate::runner::Runner;

/// SSH connection configuration for one host
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// Target host (hostname or IP)
    host: String,
    /// SSH user (optional, uses system default if not specified)
    user: Option<String>,
    /// SSH port (optional, defaults to 22)
    port: Option<u16>,
    /// Path to identity file (private key)
    identity_file: Option<PathBuf>,
    /// Additional SSH arguments
    extra_args: Vec<String>,
}

impl SshConfig {
    /// Create a new SSH configuration for the given host
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: None,
            port: None,
            identity_file: None,
            extra_args: Vec::new(),
        }
    }

    /// Set the SSH user
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the SSH port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the identity file (private key)
    pub fn with_identity_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.identity_file = Some(path.into());
        self
    }

    /// Add an extra SSH argument
    pub fn with_extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Get the host string (user@host if user is specified)
    fn host_string(&self) -> String {
        if let Some(user) = &self.user {
            format!("{}@{}", user, self.host)
        } else {
            self.host.clone()
        }
    }
}

/// Runner that executes commands on remote hosts via the ssh CLI
///
/// Holds a registry of host name to [`SshConfig`]; the harness resolves the
/// cluster fixture once and registers every node up front. The ssh process
/// itself runs through a [`LocalRunner`], so the same transport bound
/// applies.
pub struct SshRunner {
    hosts: HashMap<String, SshConfig>,
    inner: LocalRunner,
}

impl SshRunner {
    /// Create an empty runner with the default timeout
    pub fn new() -> Self {
        Self {
            hosts: HashMap::new(),
            inner: LocalRunner::new(),
        }
    }

    /// Create an empty runner with a specific transport bound
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            hosts: HashMap::new(),
            inner: LocalRunner::with_timeout(timeout),
        }
    }

    /// Register connection settings under a host name
    pub fn add_host(&mut self, name: impl Into<String>, config: SshConfig) -> &mut Self {
        self.hosts.insert(name.into(), config);
        self
    }

    /// Build the ssh invocation wrapping `command` for `config`
    fn wrap(&self, config: &SshConfig, command: &Command) -> Command {
        let mut ssh_cmd = Command::new("ssh");

        ssh_cmd.arg("-o").arg("BatchMode=yes");

        if let Some(port) = config.port {
            ssh_cmd.arg("-p").arg(port.to_string());
        }

        if let Some(identity) = &config.identity_file {
            ssh_cmd.arg("-i").arg(identity.to_string_lossy().to_string());
        }

        for arg in &config.extra_args {
            ssh_cmd.arg(arg);
        }

        ssh_cmd.arg(config.host_string());
        ssh_cmd.arg(format_remote_command(command));
        ssh_cmd
    }
}

impl Default for SshRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runner for SshRunner {
    async fn run(&self, host: &str, command: Command) -> Result<CommandResult> {
        let config = self.hosts.get(host).ok_or_else(|| Error::UnknownHost {
            host: host.to_string(),
        })?;

        debug!(host, command = %command.display_line(), "dispatching over ssh");
        self.inner.run(host, self.wrap(config, &command)).await
    }
}

/// Format a command for remote execution via SSH
fn format_remote_command(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<String> = cmd
        .get_args()
        .iter()
        .map(|arg| shell_escape(arg.to_string_lossy().to_string()))
        .collect();

    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Escape a string for safe inclusion in a shell command
fn shell_escape(s: String) -> String {
    // Single quotes cover every metacharacter except the quote itself.
    if s.contains(|c: char| c.is_whitespace() || "\"'\\$`!*?<>|&;()[]{}".contains(c)) {
        format!("'{}'", s.replace('\'', "'\"'\"'"))
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_escape() {
        assert_eq!(shell_escape("simple".to_string()), "simple");
        assert_eq!(shell_escape("with space".to_string()), "'with space'");
        assert_eq!(shell_escape("with'quote".to_string()), "'with'\"'\"'quote'");
        assert_eq!(shell_escape("$variable".to_string()), "'$variable'");
        assert_eq!(shell_escape("path/to/file".to_string()), "path/to/file");
    }

    #[test]
    fn test_ssh_config() {
        let config = SshConfig::new("ms1.example.com")
            .with_user("cluster-admin")
            .with_port(2222)
            .with_identity_file("/home/cluster-admin/.ssh/id_rsa");

        assert_eq!(config.host_string(), "cluster-admin@ms1.example.com");
        assert_eq!(config.port, Some(2222));
    }

    #[test]
    fn test_wrap_builds_ssh_invocation() {
        let mut runner = SshRunner::new();
        runner.add_host("node1", SshConfig::new("node1.example.com").with_user("root"));

        let mut cmd = Command::new("systemctl");
        cmd.arg("status").arg("vsftpd");

        let wrapped = runner.wrap(&runner.hosts["node1"], &cmd);
        assert_eq!(wrapped.get_program(), "ssh");
        let args: Vec<String> = wrapped
            .get_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.contains(&"root@node1.example.com".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("systemctl status vsftpd"));
    }

    #[test]
    fn test_unknown_host_is_rejected() {
        let runner = SshRunner::new();
        let err = smol::block_on(runner.run("nowhere", Command::new("true"))).unwrap_err();
        assert!(matches!(err, Error::UnknownHost { host } if host == "nowhere"));
    }
}
