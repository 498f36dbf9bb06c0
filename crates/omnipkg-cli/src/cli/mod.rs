//! CLI command definitions and dispatch for the `opkg` binary.
//!
//! Uses clap derive macros for argument parsing. Mutating commands carry
//! a confirmation gate that runs before any provider is invoked.

pub mod provider;
pub mod source;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Manage package sources across pluggable providers.
#[derive(Parser)]
#[command(name = "opkg", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered package sources.
    Get {
        /// Source name to match; supports `*` and `?` wildcards.
        #[arg(default_value = "*")]
        name: String,

        /// Restrict to providers matching this name or pattern.
        #[arg(long)]
        provider: Option<String>,
    },

    /// Update the configuration of an existing package source.
    Set {
        /// Source name.
        name: String,

        /// New feed location (URL or path). Omit to keep the stored value.
        #[arg(long)]
        location: Option<String>,

        /// Mark the source as trusted.
        #[arg(long, conflicts_with = "untrusted")]
        trusted: bool,

        /// Mark the source as untrusted.
        #[arg(long)]
        untrusted: bool,

        /// Restrict to providers matching this name or pattern.
        #[arg(long)]
        provider: Option<String>,

        /// Print the resulting source record.
        #[arg(long)]
        passthru: bool,

        /// Skip confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Register a new package source.
    Register {
        /// Source name.
        name: String,

        /// Feed location (URL or path).
        location: String,

        /// Mark the source as trusted.
        #[arg(long)]
        trusted: bool,

        /// Replace an existing source with the same name.
        #[arg(long)]
        force: bool,

        /// Restrict to providers matching this name or pattern.
        #[arg(long)]
        provider: Option<String>,

        /// Print the resulting source record.
        #[arg(long)]
        passthru: bool,

        /// Skip confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Remove a registered package source.
    Unregister {
        /// Source name.
        name: String,

        /// Restrict to providers matching this name or pattern.
        #[arg(long)]
        provider: Option<String>,

        /// Print the removed source record.
        #[arg(long)]
        passthru: bool,

        /// Skip confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List registered providers and their capabilities.
    Providers,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Fold the `--trusted`/`--untrusted` flag pair into tri-state trust:
/// neither flag means "do not change".
pub fn trusted_flag(trusted: bool, untrusted: bool) -> Option<bool> {
    match (trusted, untrusted) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
