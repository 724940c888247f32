//! Command-line interface definitions for twindiff.
//!
//! This module contains all CLI argument parsing structures using clap's
//! derive macros. The CLI definitions are shared between the main binary
//! and build tools (like xtask) for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes and doc
//! comments consumed by clap, so we allow missing_docs for this module.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use crate::options::CompareMode;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Main CLI structure for twindiff.
#[derive(Parser)]
#[command(
    name = "twin",
    version = crate::VERSION,
    about = "Side-by-side comparison with automatic strategy detection",
    long_about = "Compares two files or text blocks as binary data, XML markup, or plain text, \
                  picking the strategy automatically unless one is forced"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Compare two files
    Files {
        /// Left-side file
        a: String,

        /// Right-side file
        b: String,

        /// Override the configured compare mode for this run
        #[arg(short, long, value_enum)]
        mode: Option<CompareMode>,
    },

    /// Compare two literal text blocks
    Text {
        /// Left-side text
        a: String,

        /// Right-side text
        b: String,

        /// Override the configured compare mode for this run
        #[arg(short, long, value_enum)]
        mode: Option<CompareMode>,
    },

    /// Get and set comparison options
    Config {
        /// Option key
        key: Option<String>,

        /// Option value to set
        value: Option<String>,

        /// Reset the option key to its default
        #[arg(long)]
        unset: bool,

        /// List all option values
        #[arg(short, long)]
        list: bool,
    },

    /// Manage the file-filter history
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum FilterAction {
    /// Push a filter onto the history (most recently used first)
    Add {
        /// Filter string, e.g. "*.rs" or "*.c;*.h"
        filter: String,
    },

    /// List the filter history
    List,
}
