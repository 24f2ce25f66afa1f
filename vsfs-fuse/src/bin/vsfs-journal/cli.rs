use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Stage and install journaled metadata changes on a vsfs image")]
pub struct Cli {
    /// Filesystem image
    #[arg(long, short, default_value = vsfs::DEFAULT_IMAGE)]
    pub image: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log the creation of an empty file in the root directory
    Create {
        /// File name, truncated to 27 bytes
        name: String,
    },

    /// Replay the journal onto the image and clear it
    Install {
        /// Only apply transactions that reached their commit record
        #[arg(long)]
        commit_only: bool,
    },

    /// Show how much of the journal is in use
    Status,
}
