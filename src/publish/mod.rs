//! Image publisher: compile, build, tag, (login), push, (logout)

use crate::command::{CommandExecutor, CommandRunner, CommandSpec};
use crate::config::PublisherConfig;
use crate::error::{BuildError, Result};
use std::path::Path;

const PASSWORD_MASK: &str = "****";

/// Options given on the publisher command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOptions {
    pub tag: Option<String>,
    pub registry: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl PublishOptions {
    fn registry(&self) -> Option<&str> {
        self.registry.as_deref().filter(|r| !r.is_empty())
    }

    fn user(&self) -> Option<&str> {
        self.user.as_deref().filter(|u| !u.is_empty())
    }
}

/// Where the image is tagged and pushed to.
///
/// Without a registry this is the Docker Hub namespace, otherwise the
/// registry host is used as the prefix.
pub fn destination_reference(
    namespace: &str,
    registry: Option<&str>,
    image: &str,
    tag: &str,
) -> String {
    match registry {
        Some(registry) => format!("{}/{}:{}", registry, image, tag),
        None => format!("{}/{}:{}", namespace, image, tag),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Compile,
    Build,
    Tag,
    Login,
    Push,
    Logout,
}

#[derive(Debug, Clone)]
pub struct PublishStep {
    pub kind: StepKind,
    pub label: String,
    pub command: CommandSpec,
}

/// The ordered commands of one publish run
#[derive(Debug, Clone)]
pub struct PublishPlan {
    destination: String,
    steps: Vec<PublishStep>,
}

impl PublishPlan {
    /// Compose every command up front. `workdir` is bind-mounted into the
    /// build container.
    pub fn new(config: &PublisherConfig, options: &PublishOptions, workdir: &Path) -> Result<Self> {
        let user = options.user();
        if user.is_some() && options.password.is_none() {
            return Err(BuildError::Validation(
                "--dockeruser requires --dockerpass".to_string(),
            ));
        }

        let image = &config.image_name;
        let tag = options
            .tag
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(config.default_tag.as_str());
        let registry = options.registry();
        let local = format!("{}:{}", image, tag);
        let destination =
            destination_reference(&config.default_namespace, registry, image, tag);

        let mount = format!("/usr/src/{}", image);
        let mut steps = vec![
            PublishStep {
                kind: StepKind::Compile,
                label: format!("Building {} binary", image),
                command: CommandSpec::new(format!(
                    "docker run --rm -e GOPATH={mount} -v {host}:{mount} -w {mount} {build_image} \
                     go install -ldflags \"-linkmode external -extldflags -static\" {package}",
                    mount = mount,
                    host = workdir.display(),
                    build_image = config.build_image,
                    package = config.go_package,
                )),
            },
            PublishStep {
                kind: StepKind::Build,
                label: "Building image".to_string(),
                command: CommandSpec::new(format!("docker build -t {} .", local)),
            },
        ];

        let tag_command = CommandSpec::new(format!("docker tag {} {}", local, destination));
        steps.push(PublishStep {
            kind: StepKind::Tag,
            label: format!("Tagging image: {}", tag_command),
            command: tag_command,
        });

        let logged_in = if let Some(user) = user {
            let password = options.password.as_deref().unwrap_or_default();
            let login_line = |password: &str| match registry {
                Some(registry) => format!("docker login -u {} -p {} {}", user, password, registry),
                None => format!("docker login -u {} -p {}", user, password),
            };
            steps.push(PublishStep {
                kind: StepKind::Login,
                label: "Login".to_string(),
                command: CommandSpec::new(login_line(password))
                    .with_display(login_line(PASSWORD_MASK)),
            });
            true
        } else {
            false
        };

        let push_command = CommandSpec::new(format!("docker push {}", destination));
        steps.push(PublishStep {
            kind: StepKind::Push,
            label: format!("Pushing image: {}", push_command),
            command: push_command,
        });

        if logged_in {
            let line = match registry {
                Some(registry) => format!("docker logout {}", registry),
                None => "docker logout".to_string(),
            };
            steps.push(PublishStep {
                kind: StepKind::Logout,
                label: "Logout".to_string(),
                command: CommandSpec::new(line),
            });
        }

        Ok(Self { destination, steps })
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn steps(&self) -> &[PublishStep] {
        &self.steps
    }
}

/// Run the plan step by step. A failed step leaves whatever earlier steps
/// produced (local tags, a pushed image) in place.
pub fn publish<E: CommandExecutor>(runner: &mut CommandRunner<E>, plan: &PublishPlan) -> Result<()> {
    for step in plan.steps() {
        runner.logger().step(&step.label);
        runner.run(step.command.clone())?;
    }
    Ok(())
}

/// Closing line for a finished run; a dry run pushed nothing
pub fn completion_message(plan: &PublishPlan, dry_run: bool) -> String {
    if dry_run {
        format!("Dry run: {} was not pushed", plan.destination())
    } else {
        format!("Pushed {}", plan.destination())
    }
}
