//! Turning a fatal error into the process exit status

use crate::error::BuildError;
use crate::logging::Logger;
use std::io::{self, Write};
use std::process::ExitCode;

/// Report a fatal error and produce the failure exit code.
///
/// For a failed command the captured output goes to stdout verbatim, the
/// same text the operator would have seen had the command run in the
/// foreground. Everything else is logged as a single error line.
pub fn report_failure(err: &BuildError, logger: &Logger) -> ExitCode {
    if let Some(output) = err.command_output() {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(output.as_bytes());
        let _ = stdout.flush();
    }
    logger.error(&err.to_string());
    ExitCode::FAILURE
}
