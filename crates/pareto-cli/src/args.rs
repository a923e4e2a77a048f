//! Command-line argument definitions for the pareto CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global options select the configuration file, the
//! registry definition file and logging verbosity; the [`Command`] says
//! what to do.

use clap::{Parser, Subcommand};

/// Command-line arguments for the pareto directive tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to a registry definition file (TOML), overriding the configuration
    #[arg(short, long, global = true)]
    pub registry: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse and validate a single directive
    Parse {
        /// Directive text, e.g. `.p/reflect.trace{depth=3, target=reasoning}`
        directive: String,

        /// Check syntax only, without consulting the registry
        #[arg(long)]
        syntax_only: bool,

        /// Print JSON instead of the canonical directive
        #[arg(long)]
        json: bool,
    },

    /// Extract every valid directive from a file, or stdin when omitted
    Extract {
        /// Path to the input text
        file: Option<String>,

        /// Print a JSON array instead of one directive per line
        #[arg(long)]
        json: bool,
    },

    /// Print the token stream of a directive
    Tokens {
        /// Directive text
        directive: String,
    },

    /// List families, or the functions of one family
    Schema {
        /// Family to describe
        family: Option<String>,
    },
}
