//! CLI argument definitions for the cascade driver.

use std::path::PathBuf;

use cascade_cli::setup::parse_selection;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cascade",
    version,
    about = "Dependent dropdown options - inspect, select and author",
    long_about = "Work with a hierarchy of dependent dropdowns.\n\n\
                  Options offered at each level depend on the value selected above it.\n\
                  New options can be added one at a time or imported in bulk."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Dropdown configuration file (TOML).
    #[arg(
        long = "config",
        value_name = "PATH",
        default_value = "cascade.toml",
        global = true
    )]
    pub config: PathBuf,

    /// Directory holding saved options (default: platform data directory).
    #[arg(long = "store-dir", value_name = "DIR", global = true)]
    pub store_dir: Option<PathBuf>,

    /// Select a value before running the command (repeatable, applied in order).
    #[arg(
        long = "select",
        value_name = "DROPDOWN=VALUE",
        value_parser = parse_selection,
        global = true
    )]
    pub select: Vec<(String, String)>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate the configuration and print the dropdown tree.
    Check,

    /// List the options currently offered for a dropdown.
    Options {
        /// Dropdown id.
        dropdown: String,
    },

    /// Select a value and print the resulting selection.
    Select {
        /// Dropdown id.
        dropdown: String,

        /// Option value to select.
        value: String,
    },

    /// Add one option under the dropdown's current context and select it.
    Add {
        /// Dropdown id.
        dropdown: String,

        /// Label of the new option.
        label: String,
    },

    /// Import options, one per line, from a file or stdin.
    Import {
        /// Dropdown id.
        dropdown: String,

        /// Text file to read, or `-` for stdin.
        #[arg(value_name = "FILE")]
        source: PathBuf,
    },

    /// Print every stored option set.
    Show,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
