use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "stayflow",
    about = "Reservation sync daemon and operations CLI",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the config file (defaults to the platform config dir).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one sync cycle for a configured source.
    Sync {
        /// Source name.
        source: String,
    },

    /// Probe a source's endpoint and report latency.
    TestConnection {
        /// Source name.
        source: String,
    },

    /// Show aggregate integration status across all sources.
    Status,

    /// Start the daemon: periodic sync for every active source until
    /// Ctrl-C.
    Run,
}
