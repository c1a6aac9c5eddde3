// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand, ValueEnum};

use crate::dag::DuplicatePolicy;
use crate::extension::DescribeFormat;
use crate::logging::LogOptions;

/// Command-line arguments for `airflow_extension`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "airflow_extension",
    version,
    about = "Meltano extension wrapping the airflow CLI.",
    long_about = None
)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace).
    #[arg(
        long,
        value_enum,
        value_name = "LEVEL",
        env = "LOG_LEVEL",
        ignore_case = true,
        global = true
    )]
    pub log_level: Option<LogLevel>,

    /// Show timestamps in logs.
    #[arg(
        long,
        env = "LOG_TIMESTAMPS",
        global = true,
        value_parser = FalseyValueParser::new()
    )]
    pub log_timestamps: bool,

    /// Show log levels.
    #[arg(
        long,
        env = "LOG_LEVELS",
        global = true,
        value_parser = FalseyValueParser::new()
    )]
    pub log_levels: bool,

    /// Log in the Meltano JSON log format.
    #[arg(
        long,
        env = "MELTANO_LOG_JSON",
        global = true,
        value_parser = FalseyValueParser::new()
    )]
    pub meltano_log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create airflow.cfg, initialize the database and install the DAG
    /// generator.
    Initialize {
        /// Overwrite bundled files that were modified locally.
        #[arg(long)]
        force: bool,
    },

    /// Invoke the wrapped airflow CLI.
    Invoke {
        /// Airflow command followed by its arguments.
        #[arg(
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "COMMAND"
        )]
        command_args: Vec<String>,
    },

    /// Describe the available commands of this extension.
    Describe {
        #[arg(long = "format", value_enum, default_value_t = DescribeFormat::Text)]
        format: DescribeFormat,
    },

    /// Print the job graphs generated from `meltano schedule list`.
    Generate {
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Behaviour when two schedules produce the same job graph id.
        #[arg(long, value_enum, default_value_t = DuplicatePolicy::Reject)]
        on_duplicate: DuplicatePolicy,

        /// Print a readable summary instead of machine output.
        #[arg(long)]
        dry_run: bool,
    },
}

/// Serialization format of `generate`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            level: self.log_level,
            timestamps: self.log_timestamps,
            levels: self.log_levels,
            json: self.meltano_log_json,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
