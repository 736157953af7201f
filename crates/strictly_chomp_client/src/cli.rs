//! Command-line interface for the chomp client.

use clap::Parser;
use std::path::PathBuf;

/// Strictly Chomp - play poisoned chocolate against a remote opponent
#[derive(Parser, Debug)]
#[command(name = "chomp")]
#[command(about = "Networked Chomp client for a matchmaking relay", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Server host (prompted for if not given here or in the config file)
    #[arg(long, env = "CHOMP_HOST")]
    pub host: Option<String>,

    /// Server port (prompted for if not given here or in the config file)
    #[arg(short, long, env = "CHOMP_PORT")]
    pub port: Option<u16>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of standard error
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
