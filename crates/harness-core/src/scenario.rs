//! Scenario step tracing
//!
//! A scenario run walks a fixed progression; the trace records how far it
//! got so a failure report can say which step the captured output belongs
//! to.

use std::fmt;
use tracing::info;

/// The steps of a scenario run, in order of progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStep {
    /// Model items were created
    ItemCreated,
    /// The created subtree was exported to a file
    XmlExported,
    /// The exported file passed the well-formedness check
    XmlValidated,
    /// The file was re-loaded expecting a duplicate rejection
    XmlLoadAttempted,
    /// Definitions were inherited onto nodes
    Inherited,
    /// A plan was calculated
    PlanCreated,
    /// Plan execution was started
    PlanRunning,
    /// The plan reached Complete
    PlanComplete,
    /// The plan reached Failed
    PlanFailed,
    /// Post-conditions on the target hosts were checked
    PostConditionChecked,
}

impl fmt::Display for ScenarioStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ItemCreated => "item created",
            Self::XmlExported => "xml exported",
            Self::XmlValidated => "xml validated",
            Self::XmlLoadAttempted => "xml load attempted",
            Self::Inherited => "inherited",
            Self::PlanCreated => "plan created",
            Self::PlanRunning => "plan running",
            Self::PlanComplete => "plan complete",
            Self::PlanFailed => "plan failed",
            Self::PostConditionChecked => "post-condition checked",
        };
        f.write_str(name)
    }
}

/// Records the steps a scenario has completed
#[derive(Debug)]
pub struct StepTrace {
    scenario: String,
    steps: Vec<ScenarioStep>,
}

impl StepTrace {
    /// Start a trace for the named scenario
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            steps: Vec::new(),
        }
    }

    /// Record a completed step
    pub fn mark(&mut self, step: ScenarioStep) {
        info!(scenario = %self.scenario, %step, "step complete");
        self.steps.push(step);
    }

    /// The scenario name
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// All completed steps, in order
    pub fn completed(&self) -> &[ScenarioStep] {
        &self.steps
    }

    /// The most recently completed step
    pub fn last(&self) -> Option<ScenarioStep> {
        self.steps.last().copied()
    }
}
