//! IMQS build tools
//!
//! Library root shared by the `docker-build` image publisher and the
//! `imqs-build` prepare/test driver.

pub mod cli;
pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod publish;

pub use command::{CommandRunner, CommandSpec};
pub use config::BuildConfig;
pub use error::{BuildError, Result};
pub use logging::Logger;
