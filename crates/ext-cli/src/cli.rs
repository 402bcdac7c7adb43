//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect and configure the bundled string-resolver extensions
#[derive(Parser, Debug)]
#[command(name = "ext")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (discovery logs on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preference file holding stored extension configurations
    #[arg(long, global = true, env = "EXT_PREFERENCES", value_name = "PATH")]
    pub preferences: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List extensions
    ///
    /// Examples:
    ///   ext list                      # Every extension
    ///   ext list -t uml               # Extensions for UML models, generic ones included
    List {
        /// Only extensions for these document types (generic ones included)
        #[arg(short = 't', long = "doc-type", value_name = "TYPE")]
        doc_types: Vec<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show an extension and its options
    Show {
        /// Extension key
        key: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the default extension for document types
    Default {
        /// Document types to choose for
        #[arg(short = 't', long = "doc-type", value_name = "TYPE", required = true)]
        doc_types: Vec<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Configure an extension from an assignment string and store it
    ///
    /// Examples:
    ///   ext set resolver.simple "uppercase=true;max_length=12"
    Set {
        /// Extension key
        key: String,

        /// Assignments in `key=value;key=value` form
        assignments: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Reset an extension to its defaults and drop its stored configuration
    Reset {
        /// Extension key
        key: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Resolve a label for an element path with a configured extension
    ///
    /// Examples:
    ///   ext resolve resolver.ecore shop::orders::Invoice
    Resolve {
        /// Extension key
        key: String,

        /// Qualified element path, segments separated by `::`
        element: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}
