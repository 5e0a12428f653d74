//! Progeny CLI library.
//!
//! This library provides the core functionality for the `progeny` command-line
//! interface: configuration loading, reading JSON record dumps, running the
//! validate / combine / analyze / compare pipelines and formatting results.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod source;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use source::JsonFileSource;
