//! Dependent dropdown CLI.

use cascade_cli::logging::{LogConfig, LogFormat, init_logging};
use cascade_cli::setup::default_store_dir;
use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{Inputs, run_add, run_check, run_import, run_options, run_select, run_show};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let store_dir = cli.store_dir.clone().unwrap_or_else(default_store_dir);
    let inputs = Inputs {
        config: &cli.config,
        store_dir: &store_dir,
        selections: &cli.select,
    };
    let result = match &cli.command {
        Command::Check => run_check(&cli.config),
        Command::Options { dropdown } => run_options(&inputs, dropdown),
        Command::Select { dropdown, value } => run_select(&inputs, dropdown, value),
        Command::Add { dropdown, label } => run_add(&inputs, dropdown, label),
        Command::Import { dropdown, source } => run_import(&inputs, dropdown, source),
        Command::Show => run_show(&inputs),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
