//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect and maintain a wiki repository
#[derive(Parser, Debug)]
#[command(name = "wikirepo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, value_name = "FILE", env = "WIKIREPO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base repository folder; overrides the configured one
    #[arg(long, value_name = "DIR", env = "WIKIREPO_BASE")]
    pub base: Option<PathBuf>,

    /// Shadow repository folder; overrides the configured one
    #[arg(long, value_name = "DIR")]
    pub shadow: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List every file of the repository
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the most recently modified files
    ///
    /// Examples:
    ///   wikirepo recent                 # Ten newest files
    ///   wikirepo recent -n 3 --match '^/wiki/'
    Recent {
        /// Maximum number of files to show
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Only files whose logical path matches this regular expression
        #[arg(long = "match", value_name = "REGEX")]
        pattern: Option<String>,
    },

    /// Show files modified after a point in time
    Changed {
        /// Lower bound, exclusive (e.g. 2020-01-01T00:00:00.000Z)
        #[arg(long, value_name = "TIMESTAMP")]
        since: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the content of a file
    Cat {
        /// Logical path, e.g. /wiki/Index.txt
        path: String,
    },

    /// Write a file from standard input or another file
    Put {
        /// Logical path to write
        path: String,

        /// Read the content from this file instead of standard input
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,

        /// Write into the shadow repository
        #[arg(long)]
        shadow: bool,

        /// Record this modification time instead of now
        #[arg(long, value_name = "TIMESTAMP")]
        timestamp: Option<String>,
    },

    /// Delete a file
    Rm {
        /// Logical path to delete
        path: String,

        /// Delete from the shadow repository
        #[arg(long)]
        shadow: bool,
    },

    /// Rescan the repository and rewrite the file list cache
    Rebuild,

    /// Show the file name a logical path is stored under
    Encode {
        /// Logical path
        path: String,
    },

    /// Show the logical path of a stored file name
    Decode {
        /// File name relative to the repository root
        physical: String,
    },
}
