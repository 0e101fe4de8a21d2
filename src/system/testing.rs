// src/system/testing.rs

use super::executor::{CommandLine, CommandRunner, ExecutionError};
use std::cell::RefCell;

/// A `CommandRunner` that records every command instead of running it.
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    calls: RefCell<Vec<CommandLine>>,
    fail_when: Option<String>,
}

impl RecordingRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fails any command whose rendered line contains `pattern`.
    pub(crate) fn failing_when(pattern: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_when: Some(pattern.to_string()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<CommandLine> {
        self.calls.borrow().clone()
    }

    /// The recorded commands, rendered as shell lines.
    pub(crate) fn lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &CommandLine) -> Result<String, ExecutionError> {
        let rendered = command.to_string();
        self.calls.borrow_mut().push(command.clone());
        match &self.fail_when {
            Some(pattern) if rendered.contains(pattern.as_str()) => Err(ExecutionError::NonZeroExitStatus {
                command: rendered,
                code: Some(1),
                output: "simulated failure".to_string(),
            }),
            _ => Ok(format!("ran {}\n", rendered)),
        }
    }
}
