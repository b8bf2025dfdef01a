//! Command line interface module
//!
//! Argument parsing for `docker-build` and `imqs-build`, and the runners
//! that turn parsed arguments into a publish or driver run.

pub mod args;
pub mod runner;

pub use args::{CommonArgs, DriverArgs, PublisherArgs};
pub use runner::{DriverRunner, PublisherRunner};
