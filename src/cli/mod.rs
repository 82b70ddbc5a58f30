//! CLI commands for headstamp.

pub mod commit_msg;
pub mod hooks;
pub mod stamp;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// headstamp - provenance headers injected at commit time
#[derive(Parser)]
#[command(name = "headstamp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as the commit-msg hook (called by git)
    CommitMsg {
        /// Path to the pending commit message file
        message_file: PathBuf,
    },

    /// Install the commit-msg hook in this repository
    Install,

    /// Remove the commit-msg hook from this repository
    Uninstall,

    /// Print files as they would look with a fresh header
    Stamp {
        /// Files to preview
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Description to put in the header
        #[arg(long, short)]
        message: String,
    },
}
