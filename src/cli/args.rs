//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Auto-organizing placement for hierarchical item stores
#[derive(Parser, Debug)]
#[command(name = "rehome")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Catalog file (default: from config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the effective container for an item
    Resolve {
        /// Requested container id (omit for "no container")
        container: Option<String>,

        /// Item name
        #[arg(short, long, default_value = "item")]
        name: String,

        /// Item attributes as key=value (repeatable)
        #[arg(short, long = "attr")]
        attrs: Vec<String>,

        /// Item timestamp (RFC 3339, e.g. 2024-05-17T12:00:00Z)
        #[arg(long)]
        date: Option<String>,

        /// Revision tag on the requested container ref
        #[arg(long)]
        revision: Option<u64>,

        /// Print only the resolved container id
        #[arg(short, long)]
        quiet: bool,
    },

    /// List catalog containers and their policy kinds
    Show,

    /// Render the container hierarchy as a tree
    Tree,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show status
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init,

    /// Show config paths
    Path,
}
