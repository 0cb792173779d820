//! CLI argument definitions using clap
//!
//! Commands:
//! - aerocql compile [--schemas <path>] [--config <path>] [--wal <path>]
//! - aerocql replay --wal <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aerocql - CQL compiler for a multidimensional document index
#[derive(Parser, Debug)]
#[command(name = "aerocql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile CQL statements read from stdin, one per line
    Compile {
        /// Schema catalog to start from
        #[arg(long)]
        schemas: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Append mutation commands to this WAL file
        #[arg(long)]
        wal: Option<PathBuf>,
    },

    /// Print every command recorded in a WAL file
    Replay {
        /// WAL file to read
        #[arg(long)]
        wal: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
