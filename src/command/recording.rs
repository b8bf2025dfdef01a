//! Executor that records commands instead of running them
//!
//! Backs `--dry-run` and gives tests a call log to check ordering against.

use crate::command::{CommandExecutor, CommandOutput, CommandSpec};
use crate::error::Result;

#[derive(Debug, Clone)]
enum Trigger {
    Call(usize),
    Contains(String),
}

#[derive(Debug, Default, Clone)]
pub struct RecordingExecutor {
    calls: Vec<CommandSpec>,
    failures: Vec<(Trigger, CommandOutput)>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the zero-based `index`th call with the given exit code and output
    pub fn fail_at(mut self, index: usize, code: i32, output: &str) -> Self {
        self.failures
            .push((Trigger::Call(index), CommandOutput::failure(code, output)));
        self
    }

    /// Fail every call whose line contains `pattern`
    pub fn fail_matching(mut self, pattern: &str, code: i32, output: &str) -> Self {
        self.failures.push((
            Trigger::Contains(pattern.to_string()),
            CommandOutput::failure(code, output),
        ));
        self
    }

    pub fn calls(&self) -> &[CommandSpec] {
        &self.calls
    }

    /// Raw shell lines in call order
    pub fn lines(&self) -> Vec<&str> {
        self.calls.iter().map(CommandSpec::line).collect()
    }

    /// Masked lines in call order
    pub fn display_lines(&self) -> Vec<String> {
        self.calls.iter().map(CommandSpec::display_line).collect()
    }

    fn scripted_result(&self, index: usize, spec: &CommandSpec) -> Option<CommandOutput> {
        self.failures
            .iter()
            .find(|(trigger, _)| match trigger {
                Trigger::Call(at) => *at == index,
                Trigger::Contains(pattern) => spec.line().contains(pattern.as_str()),
            })
            .map(|(_, output)| output.clone())
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute(&mut self, spec: &CommandSpec) -> Result<CommandOutput> {
        let index = self.calls.len();
        self.calls.push(spec.clone());
        Ok(self
            .scripted_result(index, spec)
            .unwrap_or_else(|| CommandOutput::success("")))
    }
}
