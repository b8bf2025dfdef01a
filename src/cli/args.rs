//! Command-line argument parsing for both binaries

use crate::publish::PublishOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docker-build")]
#[command(about = "Build the router image and push it to a Docker registry")]
#[command(version)]
pub struct PublisherArgs {
    /// Docker tag to use when pushing the image
    #[arg(
        long = "dockertag",
        short = 't',
        value_name = "TAG",
        help = "Docker tag to use when pushing the image. Defaults to latest."
    )]
    pub dockertag: Option<String>,

    /// Registry to push to
    #[arg(
        long = "dockerregistry",
        short = 'r',
        value_name = "REGISTRY",
        help = "The Docker registry to use. Defaults to Docker hub (imqs namespace)."
    )]
    pub dockerregistry: Option<String>,

    #[arg(
        long = "dockeruser",
        short = 'u',
        value_name = "USER",
        help = "The Docker user to login with."
    )]
    pub dockeruser: Option<String>,

    #[arg(
        long = "dockerpass",
        short = 'p',
        value_name = "PASS",
        help = "The Docker password to login with."
    )]
    pub dockerpass: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl PublisherArgs {
    pub fn options(&self) -> PublishOptions {
        PublishOptions {
            tag: self.dockertag.clone(),
            registry: self.dockerregistry.clone(),
            user: self.dockeruser.clone(),
            password: self.dockerpass.clone(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "imqs-build")]
#[command(about = "Prepare and test the router project")]
#[command(version)]
pub struct DriverArgs {
    /// prepare | test_unit | test_integration; anything else does nothing
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Flags shared by both tools
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CommonArgs {
    #[arg(long = "config", value_name = "FILE", help = "JSON build configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long = "dry-run", help = "Print the commands instead of running them")]
    pub dry_run: bool,

    #[arg(long = "verbose", short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long = "quiet", short = 'q', help = "Only print errors")]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publisher_short_flags() {
        let args = PublisherArgs::try_parse_from([
            "docker-build", "-t", "v1", "-r", "reg:5000", "-u", "ci", "-p", "pw",
        ])
        .unwrap();
        assert_eq!(
            args.options(),
            PublishOptions {
                tag: Some("v1".to_string()),
                registry: Some("reg:5000".to_string()),
                user: Some("ci".to_string()),
                password: Some("pw".to_string()),
            }
        );
    }

    #[test]
    fn test_publisher_long_flags() {
        let args =
            PublisherArgs::try_parse_from(["docker-build", "--dockertag=v3", "--dry-run"]).unwrap();
        assert_eq!(args.dockertag.as_deref(), Some("v3"));
        assert!(args.dockerregistry.is_none());
        assert!(args.common.dry_run);
    }

    #[test]
    fn test_help_is_not_an_error_kind() {
        let err = PublisherArgs::try_parse_from(["docker-build", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_driver_accepts_any_command() {
        let args = DriverArgs::try_parse_from(["imqs-build", "whatever"]).unwrap();
        assert_eq!(args.command.as_deref(), Some("whatever"));

        let args = DriverArgs::try_parse_from(["imqs-build"]).unwrap();
        assert!(args.command.is_none());
    }
}
