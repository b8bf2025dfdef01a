//! Top-level runners tying arguments, configuration and executors together

use crate::cli::args::{CommonArgs, DriverArgs, PublisherArgs};
use crate::command::{
    CommandExecutor, CommandRunner, RecordingExecutor, ShellExecutor, ToolchainEnv,
};
use crate::config::BuildConfig;
use crate::driver::{Driver, DriverCommand};
use crate::error::Result;
use crate::logging::Logger;
use crate::publish::{self, PublishPlan};
use std::env;
use std::path::Path;

fn logger_for(common: &CommonArgs) -> Logger {
    Logger::from_flags(common.verbose, common.quiet)
}

fn print_dry_run(logger: &Logger, executor: &RecordingExecutor) {
    logger.section("Dry run");
    if executor.calls().is_empty() {
        logger.info("No commands would run");
    }
    for (i, line) in executor.display_lines().iter().enumerate() {
        logger.info(&format!("{}. {}", i + 1, line));
    }
}

pub struct PublisherRunner {
    args: PublisherArgs,
    logger: Logger,
}

impl PublisherRunner {
    pub fn new(args: PublisherArgs) -> Self {
        let logger = logger_for(&args.common);
        Self { args, logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn run(&self) -> Result<()> {
        self.execute().map(|_| ())
    }

    /// Publish, or with `--dry-run` record the commands instead. The recorded
    /// commands are returned in the dry-run case.
    pub fn execute(&self) -> Result<Option<RecordingExecutor>> {
        let config = BuildConfig::load(self.args.common.config.as_deref())?;
        let workdir = env::current_dir()?;
        let plan = PublishPlan::new(&config.publisher, &self.args.options(), &workdir)?;
        let dry_run = self.args.common.dry_run;

        self.logger.section("Docker Image Publisher");
        self.logger.info(&format!("Destination: {}", plan.destination()));

        let recorded = if dry_run {
            let executor = self.publish_with(RecordingExecutor::new(), &plan)?;
            print_dry_run(&self.logger, &executor);
            Some(executor)
        } else {
            self.publish_with(ShellExecutor::new(), &plan)?;
            None
        };

        self.logger
            .success(&publish::completion_message(&plan, dry_run));
        self.logger.info(&format!(
            "Done in {}",
            self.logger.format_duration(self.logger.elapsed())
        ));
        Ok(recorded)
    }

    fn publish_with<E: CommandExecutor>(&self, executor: E, plan: &PublishPlan) -> Result<E> {
        let mut runner = CommandRunner::new(executor, self.logger.clone());
        publish::publish(&mut runner, plan)?;
        Ok(runner.into_executor())
    }
}

pub struct DriverRunner {
    args: DriverArgs,
    logger: Logger,
}

impl DriverRunner {
    pub fn new(args: DriverArgs) -> Self {
        let logger = logger_for(&args.common);
        Self { args, logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Run the selected command with the toolchain variable pointed at the
    /// current directory. The previous value is back in place once this
    /// returns, whatever the outcome.
    pub fn run(&self) -> Result<()> {
        self.execute().map(|_| ())
    }

    /// Same as [`DriverRunner::run`], returning the recorded commands when
    /// `--dry-run` is set.
    pub fn execute(&self) -> Result<Option<RecordingExecutor>> {
        let config = BuildConfig::load(self.args.common.config.as_deref())?;
        let root = env::current_dir()?;
        let command = DriverCommand::parse(self.args.command.as_deref());

        let toolchain = ToolchainEnv::set(&config.driver.toolchain_var, &root);
        self.logger.detail(&format!(
            "{} set to {}",
            toolchain.var(),
            root.display()
        ));

        if self.args.common.dry_run {
            let executor = self.drive_with(RecordingExecutor::new(), &config, &root, command)?;
            print_dry_run(&self.logger, &executor);
            Ok(Some(executor))
        } else {
            self.drive_with(ShellExecutor::new(), &config, &root, command)?;
            Ok(None)
        }
    }

    fn drive_with<E: CommandExecutor>(
        &self,
        executor: E,
        config: &BuildConfig,
        root: &Path,
        command: Option<DriverCommand>,
    ) -> Result<E> {
        let mut runner = CommandRunner::new(executor, self.logger.clone());
        Driver::new(&config.driver, root)
            .with_dry_run(self.args.common.dry_run)
            .run(&mut runner, command)?;
        Ok(runner.into_executor())
    }
}
