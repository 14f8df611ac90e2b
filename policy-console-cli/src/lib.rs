//! Policy Console command-line client
//!
//! Exposes each policy API operation as a subcommand and runs the
//! description step of the creation wizard against a live server.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Command};
pub use commands::{dispatch, run, CliError, CliResult};
pub use config::Settings;
