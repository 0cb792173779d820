//! CLI module for aerocql
//!
//! Provides command-line interface for:
//! - compile: Compile CQL statements from stdin into JSON commands
//! - replay: Print the commands recorded in a WAL file

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{compile, open_wal, replay, replay_to, run, run_command, run_session};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
