use imqs_build_tools::command::{CommandRunner, RecordingExecutor, ToolchainEnv};
use imqs_build_tools::config::DriverConfig;
use imqs_build_tools::driver::{Driver, DriverCommand};
use imqs_build_tools::error::BuildError;
use imqs_build_tools::logging::Logger;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn drive(
    config: &DriverConfig,
    root: &Path,
    command: Option<DriverCommand>,
    executor: RecordingExecutor,
) -> (Result<(), BuildError>, RecordingExecutor) {
    let mut runner = CommandRunner::new(executor, Logger::new_quiet());
    let result = Driver::new(config, root).run(&mut runner, command);
    (result, runner.into_executor())
}

#[test]
fn test_unrecognized_command_runs_nothing() {
    let config = DriverConfig::default();
    let command = DriverCommand::parse(Some("deploy"));
    let (result, executor) = drive(&config, Path::new("."), command, RecordingExecutor::new());

    result.unwrap();
    assert!(executor.calls().is_empty());
}

#[test]
fn test_integration_is_a_no_op() {
    let config = DriverConfig::default();
    let (result, executor) = drive(
        &config,
        Path::new("."),
        Some(DriverCommand::TestIntegration),
        RecordingExecutor::new(),
    );

    result.unwrap();
    assert!(executor.calls().is_empty());
}

#[test]
fn test_prepare_installs_and_copies() {
    let scratch = tempfile::tempdir().unwrap();
    let project = scratch.path().join("router");
    fs::create_dir_all(project.join("bin")).unwrap();
    fs::write(project.join("bin/router"), b"binary").unwrap();

    let config = DriverConfig {
        artifact: PathBuf::from("bin/router"),
        ..Default::default()
    };
    let (result, executor) = drive(
        &config,
        &project,
        Some(DriverCommand::Prepare),
        RecordingExecutor::new(),
    );

    result.unwrap();
    assert_eq!(executor.lines(), vec!["go install github.com/IMQS/router"]);
    assert_eq!(
        fs::read(scratch.path().join("out/bin/router")).unwrap(),
        b"binary"
    );
}

#[test]
fn test_prepare_failure_skips_copy() {
    let scratch = tempfile::tempdir().unwrap();
    let project = scratch.path().join("router");
    fs::create_dir_all(project.join("bin")).unwrap();
    fs::write(project.join("bin/router"), b"stale").unwrap();

    let config = DriverConfig {
        artifact: PathBuf::from("bin/router"),
        ..Default::default()
    };
    let executor = RecordingExecutor::new().fail_at(0, 2, "cannot find package\n");
    let (result, _) = drive(&config, &project, Some(DriverCommand::Prepare), executor);

    assert!(matches!(result, Err(BuildError::CommandFailed { code: Some(2), .. })));
    assert!(!scratch.path().join("out").exists());
}

#[test]
fn test_unit_stops_at_first_failing_package() {
    let config = DriverConfig {
        test_packages: vec!["pkg/a".to_string(), "pkg/b".to_string()],
        smoke_test: Some("ruby resttest.rb".to_string()),
        ..Default::default()
    };
    let executor = RecordingExecutor::new().fail_at(1, 1, "--- FAIL: TestRoute\n");
    let (result, executor) = drive(
        &config,
        Path::new("."),
        Some(DriverCommand::TestUnit),
        executor,
    );

    assert!(result.is_err());
    assert_eq!(
        executor.lines(),
        vec![
            "go test -race pkg/a -test.cpu 2",
            "go test -race pkg/b -test.cpu 2",
        ]
    );
}

#[test]
fn test_toolchain_var_restored_after_failed_run() {
    let var = "IMQS_BUILD_TEST_DRIVER_GOPATH";
    unsafe { env::set_var(var, "/home/ci/go") };

    let config = DriverConfig {
        toolchain_var: var.to_string(),
        ..Default::default()
    };
    let result = {
        let _toolchain = ToolchainEnv::set(&config.toolchain_var, "/work/router");
        assert_eq!(env::var(var).unwrap(), "/work/router");
        let executor = RecordingExecutor::new().fail_at(0, 1, "");
        drive(&config, Path::new("."), Some(DriverCommand::TestUnit), executor).0
    };

    assert!(result.is_err());
    assert_eq!(env::var(var).unwrap(), "/home/ci/go");
    unsafe { env::remove_var(var) };
}
