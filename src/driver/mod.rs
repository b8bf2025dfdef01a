//! Project driver: `prepare`, `test_unit`, `test_integration`
//!
//! One subcommand selects one fixed step sequence. Anything else is a silent
//! no-op, leaving it to the calling harness to decide whether that matters.

use crate::command::{CommandExecutor, CommandRunner, CommandSpec};
use crate::config::DriverConfig;
use crate::error::{BuildError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    Prepare,
    TestUnit,
    TestIntegration,
}

impl DriverCommand {
    /// Map the positional argument to a command; unknown or absent is `None`
    pub fn parse(name: Option<&str>) -> Option<Self> {
        match name? {
            "prepare" => Some(DriverCommand::Prepare),
            "test_unit" => Some(DriverCommand::TestUnit),
            "test_integration" => Some(DriverCommand::TestIntegration),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DriverCommand::Prepare => "prepare",
            DriverCommand::TestUnit => "test_unit",
            DriverCommand::TestIntegration => "test_integration",
        }
    }
}

/// `go install` for the project package
pub fn prepare_command(config: &DriverConfig) -> CommandSpec {
    CommandSpec::new(format!("go install {}", config.go_package))
}

/// Race runs for every package, then plain runs, then the smoke test.
///
/// The race detector currently changes nothing about the outcome, but the
/// two passes stay separate so stress tests can later be limited to the
/// plain pass (`-race` costs roughly 10x memory and time).
pub fn unit_test_commands(config: &DriverConfig) -> Vec<CommandSpec> {
    let race = config.test_packages.iter().map(|pkg| {
        CommandSpec::new(format!("go test -race {} -test.cpu {}", pkg, config.test_cpu))
    });
    let plain = config.test_packages.iter().map(|pkg| {
        CommandSpec::new(format!("go test {} -test.cpu {}", pkg, config.test_cpu))
    });
    race.chain(plain)
        .chain(config.smoke_test.iter().map(CommandSpec::new))
        .collect()
}

/// Copy the built artifact into `<out_dir>/bin/`, keeping its file name.
/// Paths are relative to `root`. Returns the destination path.
pub fn copy_artifact(config: &DriverConfig, root: &Path) -> Result<PathBuf> {
    let source = root.join(&config.artifact);
    let file_name = config.artifact.file_name().ok_or_else(|| {
        BuildError::Config(format!(
            "artifact path has no file name: {}",
            config.artifact.display()
        ))
    })?;

    let dest_dir = root.join(&config.out_dir).join("bin");
    fs::create_dir_all(&dest_dir)?;
    let dest = dest_dir.join(file_name);

    fs::copy(&source, &dest).map_err(|e| {
        BuildError::Io(io::Error::new(
            e.kind(),
            format!("copy {} -> {}: {}", source.display(), dest.display(), e),
        ))
    })?;
    Ok(dest)
}

pub struct Driver<'a> {
    config: &'a DriverConfig,
    root: PathBuf,
    dry_run: bool,
}

impl<'a> Driver<'a> {
    pub fn new(config: &'a DriverConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
            dry_run: false,
        }
    }

    /// Skip filesystem side effects (the artifact copy)
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn run<E: CommandExecutor>(
        &self,
        runner: &mut CommandRunner<E>,
        command: Option<DriverCommand>,
    ) -> Result<()> {
        let Some(command) = command else {
            runner.logger().verbose("No recognized command, nothing to do");
            return Ok(());
        };

        runner.logger().section(command.name());
        match command {
            DriverCommand::Prepare => self.prepare(runner),
            DriverCommand::TestUnit => {
                runner.run_all(unit_test_commands(self.config))?;
                runner.logger().success("Unit tests passed");
                Ok(())
            }
            DriverCommand::TestIntegration => {
                // TODO: log into the IMQS domain (or whatever a CI box can reach)
                runner
                    .logger()
                    .info("No integration tests defined");
                Ok(())
            }
        }
    }

    fn prepare<E: CommandExecutor>(&self, runner: &mut CommandRunner<E>) -> Result<()> {
        runner.logger().step(&format!("Building {}", self.config.go_package));
        runner.run(prepare_command(self.config))?;

        if self.dry_run {
            runner.logger().info(&format!(
                "Dry run: skipping copy of {} to {}",
                self.config.artifact.display(),
                self.config.out_dir.join("bin").display()
            ));
            return Ok(());
        }

        let dest = copy_artifact(self.config, &self.root)?;
        runner
            .logger()
            .success(&format!("Copied artifact to {}", dest.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!(DriverCommand::parse(Some("prepare")), Some(DriverCommand::Prepare));
        assert_eq!(DriverCommand::parse(Some("test_unit")), Some(DriverCommand::TestUnit));
        assert_eq!(
            DriverCommand::parse(Some("test_integration")),
            Some(DriverCommand::TestIntegration)
        );
        assert_eq!(DriverCommand::parse(Some("deploy")), None);
        assert_eq!(DriverCommand::parse(Some("Prepare")), None);
        assert_eq!(DriverCommand::parse(None), None);
    }

    #[test]
    fn test_unit_test_order() {
        let config = DriverConfig {
            test_packages: vec!["pkg/a".to_string(), "pkg/b".to_string()],
            smoke_test: Some("ruby resttest.rb".to_string()),
            ..Default::default()
        };
        let lines: Vec<String> = unit_test_commands(&config)
            .iter()
            .map(|c| c.line().to_string())
            .collect();
        assert_eq!(
            lines,
            vec![
                "go test -race pkg/a -test.cpu 2",
                "go test -race pkg/b -test.cpu 2",
                "go test pkg/a -test.cpu 2",
                "go test pkg/b -test.cpu 2",
                "ruby resttest.rb",
            ]
        );
    }

    #[test]
    fn test_copy_artifact_into_out_bin() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("project/bin")).unwrap();
        fs::write(root.path().join("project/bin/router"), b"ELF").unwrap();

        let config = DriverConfig {
            artifact: PathBuf::from("bin/router"),
            out_dir: PathBuf::from("../out"),
            ..Default::default()
        };
        let project = root.path().join("project");
        let dest = copy_artifact(&config, &project).unwrap();

        assert!(dest.ends_with("out/bin/router"));
        assert_eq!(fs::read(root.path().join("out/bin/router")).unwrap(), b"ELF");
    }

    #[test]
    fn test_copy_missing_artifact_fails() {
        let root = tempfile::tempdir().unwrap();
        let config = DriverConfig {
            artifact: PathBuf::from("bin/missing"),
            out_dir: PathBuf::from("out"),
            ..Default::default()
        };
        let err = copy_artifact(&config, root.path()).unwrap_err();
        assert!(matches!(err, BuildError::Io(_)));
        assert!(err.to_string().contains("bin/missing"));
    }
}
