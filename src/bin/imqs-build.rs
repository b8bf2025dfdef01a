use clap::Parser;
use imqs_build_tools::cli::{DriverArgs, DriverRunner};
use imqs_build_tools::error::handlers::report_failure;
use std::process::ExitCode;

fn main() -> ExitCode {
    let runner = DriverRunner::new(DriverArgs::parse());
    // The toolchain override lives inside `run`, so it is already restored
    // by the time the exit code is returned.
    match runner.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err, runner.logger()),
    }
}
