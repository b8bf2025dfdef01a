//! Error types for build orchestration

pub mod handlers;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BuildError>;

#[derive(Error, Debug)]
pub enum BuildError {
    /// An external command exited non-zero (or was killed by a signal)
    #[error("Command failed ({}): {command}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl BuildError {
    /// Captured output of the failing command, if this is a command failure
    pub fn command_output(&self) -> Option<&str> {
        match self {
            BuildError::CommandFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}
