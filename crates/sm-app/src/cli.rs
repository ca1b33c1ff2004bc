//! Command line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "stakeholder-map",
    version,
    about = "Interactive map of the extrusion symposium stakeholder network"
)]
pub struct Cli {
    /// Stakeholder CSV (overrides the config file).
    #[arg(long = "data", value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Geocode cache JSON (overrides the config file).
    #[arg(long = "cache", value_name = "JSON")]
    pub cache: Option<PathBuf>,

    /// Dashboard configuration file.
    #[arg(long = "config", value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
