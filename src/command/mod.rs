//! Running external commands
//!
//! Every step of both tools goes through [`CommandRunner::run`]: the command
//! runs through the host shell with its output captured, and a non-zero exit
//! turns into [`BuildError::CommandFailed`]. Callers propagate that with `?`,
//! so the first failure ends the run and no later step executes.

pub mod env;
pub mod executor;
pub mod recording;

pub use env::ToolchainEnv;
pub use executor::{CommandExecutor, ShellExecutor};
pub use recording::RecordingExecutor;

use crate::error::{BuildError, Result};
use crate::logging::Logger;
use std::fmt;
use std::path::{Path, PathBuf};

/// A shell command line plus an optional working directory for the child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    line: String,
    dir: Option<PathBuf>,
    display: Option<String>,
}

impl CommandSpec {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            dir: None,
            display: None,
        }
    }

    /// Run the command with `dir` as its working directory. The caller's own
    /// working directory is left alone.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Show `display` instead of the real line in logs and error messages,
    /// e.g. the same command with its password masked.
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// The exact line handed to the shell
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// The line as shown in logs and error messages
    pub fn display_line(&self) -> String {
        self.display.clone().unwrap_or_else(|| self.line.clone())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_line())
    }
}

/// Exit status and combined stdout/stderr of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub output: String,
}

impl CommandOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            output: output.into(),
        }
    }

    pub fn failure(code: i32, output: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            output: output.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Fail-fast command runner shared by the publisher and the driver
pub struct CommandRunner<E: CommandExecutor> {
    executor: E,
    logger: Logger,
}

impl<E: CommandExecutor> CommandRunner<E> {
    pub fn new(executor: E, logger: Logger) -> Self {
        Self { executor, logger }
    }

    /// Execute one command. Success is silent apart from verbose logging; a
    /// non-zero exit becomes an error carrying the captured output.
    pub fn run(&mut self, spec: CommandSpec) -> Result<()> {
        self.logger.verbose(&format!("$ {}", spec));
        if let Some(dir) = spec.dir() {
            self.logger.detail(&format!("working directory: {}", dir.display()));
        }

        let result = self.executor.execute(&spec)?;
        if result.is_success() {
            return Ok(());
        }

        Err(BuildError::CommandFailed {
            command: spec.display_line(),
            code: result.code,
            output: result.output,
        })
    }

    /// Run commands in order, stopping at the first failure
    pub fn run_all(&mut self, specs: impl IntoIterator<Item = CommandSpec>) -> Result<()> {
        for spec in specs {
            self.run(spec)?;
        }
        Ok(())
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }
}
