//! Plan lifecycle states as observed through `show_plan`

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The lifecycle state of a deployment plan
///
/// Transitions are driven entirely by the orchestrator; the harness only
/// observes the state and may request transitions via `create_plan` and
/// `run_plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    /// No plan exists
    NotRunning,
    /// Plan created but not started
    Initial,
    /// Plan is executing
    Running,
    /// Plan was stopped before finishing
    Stopped,
    /// Plan execution failed
    Failed,
    /// Plan executed to completion
    Complete,
}

impl PlanState {
    /// Terminal states: the orchestrator will not move past these on its own
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed | Self::Complete)
    }

    /// Scan `show_plan` stdout for a `Plan Status: <state>` line
    pub fn parse_show_plan(stdout: &[String]) -> crate::Result<Self> {
        for line in stdout {
            if let Some(rest) = line.trim().strip_prefix("Plan Status:") {
                return rest.trim().parse();
            }
        }
        Err(Error::UnknownPlanState(stdout.join("\n")))
    }
}

impl FromStr for PlanState {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not running" => Ok(Self::NotRunning),
            "initial" => Ok(Self::Initial),
            "running" => Ok(Self::Running),
            "stopped" => Ok(Self::Stopped),
            "failed" => Ok(Self::Failed),
            // The product prints "Successful" for a finished plan.
            "complete" | "successful" => Ok(Self::Complete),
            other => Err(Error::UnknownPlanState(other.to_string())),
        }
    }
}

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotRunning => "Not Running",
            Self::Initial => "Initial",
            Self::Running => "Running",
            Self::Stopped => "Stopped",
            Self::Failed => "Failed",
            Self::Complete => "Complete",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_states() {
        assert_eq!("Initial".parse::<PlanState>().unwrap(), PlanState::Initial);
        assert_eq!("running".parse::<PlanState>().unwrap(), PlanState::Running);
        assert_eq!("Successful".parse::<PlanState>().unwrap(), PlanState::Complete);
        assert_eq!("Complete".parse::<PlanState>().unwrap(), PlanState::Complete);
        assert!("pending".parse::<PlanState>().is_err());
    }

    #[test]
    fn test_parse_show_plan_output() {
        let stdout = vec![
            "Tasks: 4 | Initial: 0 | Running: 0 | Success: 4 | Failed: 0".to_string(),
            "Plan Status: Successful".to_string(),
        ];
        assert_eq!(PlanState::parse_show_plan(&stdout).unwrap(), PlanState::Complete);
    }

    #[test]
    fn test_parse_show_plan_without_status_line() {
        let stdout = vec!["no status here".to_string()];
        assert!(matches!(
            PlanState::parse_show_plan(&stdout),
            Err(Error::UnknownPlanState(_))
        ));
    }

    #[test]
    fn test_terminal_states() {
        assert!(PlanState::Failed.is_terminal());
        assert!(PlanState::Stopped.is_terminal());
        assert!(PlanState::Complete.is_terminal());
        assert!(!PlanState::Running.is_terminal());
        assert!(!PlanState::Initial.is_terminal());
        assert!(!PlanState::NotRunning.is_terminal());
    }
}
