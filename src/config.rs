//! Build configuration: the service-specific constants both tools work with
//!
//! Defaults reproduce the values the router build has always used. A JSON
//! file can replace any of them, and a handful of `IMQS_BUILD_*` environment
//! variables override the result.

use crate::error::{BuildError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for the image publisher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Local image name, also the mount point name inside the build container
    pub image_name: String,
    /// Container image holding the Go toolchain
    pub build_image: String,
    /// Package compiled inside the build container
    pub go_package: String,
    /// Docker Hub namespace used when no registry is given
    pub default_namespace: String,
    /// Tag used when `--dockertag` is omitted
    pub default_tag: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            image_name: "router".to_string(),
            build_image: "golang:1.8".to_string(),
            go_package: "github.com/IMQS/router-core".to_string(),
            default_namespace: "imqs".to_string(),
            default_tag: "latest".to_string(),
        }
    }
}

/// Settings for the prepare/test driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Package built by `prepare`
    pub go_package: String,
    /// Binary produced by `go install`, relative to the project root
    pub artifact: PathBuf,
    /// Output tree; the artifact lands in `<out_dir>/bin/`
    pub out_dir: PathBuf,
    /// Packages exercised by `test_unit`
    pub test_packages: Vec<String>,
    /// Value passed to `-test.cpu`
    pub test_cpu: u32,
    /// Extra script-based smoke test run at the end of `test_unit`
    pub smoke_test: Option<String>,
    /// Toolchain search-path variable pointed at the project for the run
    pub toolchain_var: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            go_package: "github.com/IMQS/router".to_string(),
            artifact: PathBuf::from(format!("bin/router{}", env::consts::EXE_SUFFIX)),
            out_dir: PathBuf::from("../out"),
            test_packages: vec!["github.com/IMQS/router/server".to_string()],
            test_cpu: 2,
            smoke_test: None,
            toolchain_var: "GOPATH".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub publisher: PublisherConfig,
    pub driver: DriverConfig,
}

impl BuildConfig {
    /// Load from an optional JSON file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BuildError::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Override fields from `IMQS_BUILD_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(val) = env::var("IMQS_BUILD_IMAGE_NAME") {
            self.publisher.image_name = val;
        }
        if let Ok(val) = env::var("IMQS_BUILD_BUILD_IMAGE") {
            self.publisher.build_image = val;
        }
        if let Ok(val) = env::var("IMQS_BUILD_NAMESPACE") {
            self.publisher.default_namespace = val;
        }
        if let Ok(val) = env::var("IMQS_BUILD_OUT_DIR") {
            self.driver.out_dir = PathBuf::from(val);
        }
        if let Ok(val) = env::var("IMQS_BUILD_SMOKE_TEST") {
            self.driver.smoke_test = if val.is_empty() { None } else { Some(val) };
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.publisher.image_name.is_empty() {
            return Err(BuildError::Validation(
                "image_name cannot be empty".to_string(),
            ));
        }
        if self.publisher.default_namespace.is_empty() {
            return Err(BuildError::Validation(
                "default_namespace cannot be empty".to_string(),
            ));
        }
        if self.publisher.go_package.is_empty() || self.driver.go_package.is_empty() {
            return Err(BuildError::Validation(
                "go_package cannot be empty".to_string(),
            ));
        }
        if self.driver.toolchain_var.is_empty() {
            return Err(BuildError::Validation(
                "toolchain_var cannot be empty".to_string(),
            ));
        }
        if self.driver.test_cpu == 0 {
            return Err(BuildError::Validation(
                "test_cpu must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
