//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Folio - portfolio site tools
#[derive(Parser, Debug)]
#[command(name = "folio", version)]
#[command(about = "Serve and inspect the Folio portfolio site", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP site
    Serve,
    /// Fetch projects and certificates and mirror them locally
    Sync,
    /// Show a project detail by id
    Project {
        /// Project id as it appears in `/project/{id}`
        id: String,
        /// Read the remote collection when the mirror misses
        #[arg(long)]
        fetch: bool,
    },
    /// Comment operations
    Comments {
        /// Comment action
        #[command(subcommand)]
        action: CommentsAction,
    },
    /// Print the hero typewriter frames
    Typewriter {
        /// Number of ticks to print
        #[arg(long, default_value_t = 40)]
        ticks: usize,
        /// Animate in real time until Ctrl+C
        #[arg(long)]
        live: bool,
    },
    /// Configuration file operations
    Config {
        /// Config action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Comment subcommands.
#[derive(Subcommand, Debug)]
pub enum CommentsAction {
    /// Print comments, newest first
    List,
    /// Post a comment
    Post {
        /// Author name
        #[arg(long)]
        author: String,
        /// Comment text
        #[arg(long)]
        text: String,
        /// Profile image file
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print one value by dotted key, e.g. `site.port`
    Get {
        /// Dotted key
        key: String,
    },
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Where to write it; defaults to the platform config directory
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
