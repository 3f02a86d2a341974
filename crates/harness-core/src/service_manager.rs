//! Table-driven service status probes
//!
//! The mapping from exit codes and output text to service state belongs to
//! the remote service manager's contract, not to individual call sites.
//! Each supported manager is one [`ServiceManager`] table; supporting a new
//! manager means supplying another table, never editing scenario code.

use std::fmt;

use command_runner::{Command, CommandResult, Runner};
use tracing::debug;

use crate::assertions::is_text_in_list;
use crate::{Error, Result};

/// What a status probe observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceProbe {
    /// The service is running
    Running,
    /// The service is installed but not running
    Stopped,
    /// The service manager does not know the unit at all
    NotInstalled,
    /// None of the table's conventions matched
    Unknown,
}

impl fmt::Display for ServiceProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::NotInstalled => "not installed",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One remote service manager's status conventions
#[derive(Debug, Clone)]
pub struct ServiceManager {
    /// Manager name, for logs
    pub name: &'static str,
    /// Program that reports status
    pub status_program: &'static str,
    /// Argument template; `{service}` is replaced with the unit name
    pub status_args: &'static [&'static str],
    /// Exit codes meaning "running"
    pub running_exit_codes: &'static [i32],
    /// Exit codes meaning "installed but stopped"
    pub stopped_exit_codes: &'static [i32],
    /// Exit code reserved for "no such unit"
    pub missing_exit_code: i32,
    /// Text accompanying the missing exit code; `{service}` is replaced
    pub missing_text: &'static str,
}

/// systemd conventions: `systemctl status <unit>`
pub const SYSTEMD: ServiceManager = ServiceManager {
    name: "systemd",
    status_program: "systemctl",
    status_args: &["status", "{service}"],
    running_exit_codes: &[0],
    stopped_exit_codes: &[3],
    missing_exit_code: 4,
    missing_text: "Unit {service}.service could not be found.",
};

/// SysV init conventions: `service <name> status`
pub const SYSVINIT: ServiceManager = ServiceManager {
    name: "sysvinit",
    status_program: "service",
    status_args: &["{service}", "status"],
    running_exit_codes: &[0],
    stopped_exit_codes: &[3],
    missing_exit_code: 1,
    missing_text: "unrecognized service",
};

impl ServiceManager {
    /// Build the status command for `service`, optionally via sudo
    pub fn status_command(&self, service: &str, privileged: bool) -> Command {
        let mut cmd;
        if privileged {
            cmd = Command::new("sudo");
            cmd.arg(self.status_program);
        } else {
            cmd = Command::new(self.status_program);
        }
        for arg in self.status_args {
            cmd.arg(arg.replace("{service}", service));
        }
        cmd
    }

    /// The "no such unit" text for `service`
    pub fn missing_text_for(&self, service: &str) -> String {
        self.missing_text.replace("{service}", service)
    }

    /// Map a captured status result onto a [`ServiceProbe`]
    pub fn interpret(&self, service: &str, result: &CommandResult) -> ServiceProbe {
        let code = result.exit_code();

        if self.running_exit_codes.contains(&code) {
            return ServiceProbe::Running;
        }

        if code == self.missing_exit_code {
            let text = self.missing_text_for(service);
            // systemd prints the complaint on stderr, others on stdout.
            if is_text_in_list(&text, result.stderr()) || is_text_in_list(&text, result.stdout()) {
                return ServiceProbe::NotInstalled;
            }
        }

        if self.stopped_exit_codes.contains(&code) {
            return ServiceProbe::Stopped;
        }

        ServiceProbe::Unknown
    }
}

/// Run a status probe for `service` on `host`
pub async fn probe_service(
    runner: &dyn Runner,
    host: &str,
    manager: &ServiceManager,
    service: &str,
    privileged: bool,
) -> Result<ServiceProbe> {
    let cmd = manager.status_command(service, privileged);
    let result = runner.run(host, cmd).await?;
    let probe = manager.interpret(service, &result);
    debug!(host, service, manager = manager.name, %probe, "service status probe");
    Ok(probe)
}

/// Fail the scenario unless `service` is running on `host`
pub async fn require_running(
    runner: &dyn Runner,
    host: &str,
    manager: &ServiceManager,
    service: &str,
    privileged: bool,
) -> Result<()> {
    match probe_service(runner, host, manager, service, privileged).await? {
        ServiceProbe::Running => Ok(()),
        actual => Err(Error::ServiceState {
            host: host.to_string(),
            service: service.to_string(),
            expected: "running",
            actual,
        }),
    }
}

/// Fail the scenario if `service` is reported running on `host`
///
/// Stopped, absent and unknown all pass; the check only rules out a live
/// process.
pub async fn require_not_running(
    runner: &dyn Runner,
    host: &str,
    manager: &ServiceManager,
    service: &str,
    privileged: bool,
) -> Result<()> {
    match probe_service(runner, host, manager, service, privileged).await? {
        ServiceProbe::Running => Err(Error::ServiceState {
            host: host.to_string(),
            service: service.to_string(),
            expected: "not running",
            actual: ServiceProbe::Running,
        }),
        _ => Ok(()),
    }
}

/// Fail the scenario unless `service` is absent from `host`
pub async fn require_not_installed(
    runner: &dyn Runner,
    host: &str,
    manager: &ServiceManager,
    service: &str,
    privileged: bool,
) -> Result<()> {
    match probe_service(runner, host, manager, service, privileged).await? {
        ServiceProbe::NotInstalled => Ok(()),
        actual => Err(Error::ServiceState {
            host: host.to_string(),
            service: service.to_string(),
            expected: "not installed",
            actual,
        }),
    }
}
