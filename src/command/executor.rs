//! Executor seam and the host-shell implementation

use crate::command::{CommandOutput, CommandSpec};
use crate::error::Result;
use std::process::Command;

/// Something that can run a [`CommandSpec`] to completion
pub trait CommandExecutor {
    fn execute(&mut self, spec: &CommandSpec) -> Result<CommandOutput>;
}

impl<E: CommandExecutor + ?Sized> CommandExecutor for &mut E {
    fn execute(&mut self, spec: &CommandSpec) -> Result<CommandOutput> {
        (**self).execute(spec)
    }
}

/// Runs commands through the host shell and captures their output
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

// cmd.exe does its own parsing of everything after /C, so the line must
// reach it unquoted.
#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let mut command = Command::new("cmd");
    command.arg("/C").raw_arg(line);
    command
}

#[cfg(not(windows))]
fn shell_command(line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(line);
    command
}

impl CommandExecutor for ShellExecutor {
    fn execute(&mut self, spec: &CommandSpec) -> Result<CommandOutput> {
        let mut command = shell_command(spec.line());
        if let Some(dir) = spec.dir() {
            command.current_dir(dir);
        }

        let output = command.output()?;

        // stdout first, then stderr
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            code: output.status.code(),
            output: text,
        })
    }
}
