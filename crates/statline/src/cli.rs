//! Command-line interface for statline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Statline - guess the player from their stat line
#[derive(Parser, Debug)]
#[command(name = "statline")]
#[command(about = "Guess the football player from a season stat table", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (overrides $STATLINE_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to a JSON player catalog (defaults to the built-in catalog)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play rounds in the terminal
    Play {
        /// Stop after this many rounds
        #[arg(short, long)]
        rounds: Option<u32>,

        /// Seed for reproducible target order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check whether a name matches a catalog player
    Check {
        /// Player id in the catalog
        id: String,

        /// Name to check
        name: String,
    },
}
