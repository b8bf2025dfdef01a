use clap::Parser;
use imqs_build_tools::cli::{PublisherArgs, PublisherRunner};
use imqs_build_tools::error::handlers::report_failure;
use std::process::ExitCode;

fn main() -> ExitCode {
    let runner = PublisherRunner::new(PublisherArgs::parse());
    match runner.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err, runner.logger()),
    }
}
