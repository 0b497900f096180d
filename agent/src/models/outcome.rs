//! Execution outcome models

use serde::Serialize;

/// Captured result of one remote command invocation
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    /// Remote exit status; `None` when the channel closed without one
    pub exit_code: Option<u32>,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error; under a PTY this may be folded into stdout
    pub stderr: String,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Per-line slot of an execution result, positionally aligned with the
/// deployment's script lines
#[derive(Debug, Clone, Serialize)]
pub struct LineOutcome {
    /// Command of the script line this slot belongs to
    pub command: String,

    /// Captured outcome; `None` when the line failed before completing
    pub outcome: Option<CommandOutcome>,

    /// Transport or dispatch error for lines that did not complete
    pub error: Option<String>,
}

impl LineOutcome {
    /// Slot for a line that ran to completion (successfully or not)
    pub fn completed(command: &str, outcome: CommandOutcome) -> Self {
        Self {
            command: command.to_string(),
            outcome: Some(outcome),
            error: None,
        }
    }

    /// Slot for a line that errored before producing an outcome
    pub fn failed(command: &str, error: String) -> Self {
        Self {
            command: command.to_string(),
            outcome: None,
            error: Some(error),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none() && self.outcome.as_ref().is_some_and(CommandOutcome::succeeded)
    }
}

/// Ordered per-line outcomes of one deployment execution
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub outcomes: Vec<LineOutcome>,
}

impl ExecutionResult {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(LineOutcome::succeeded)
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }
}
