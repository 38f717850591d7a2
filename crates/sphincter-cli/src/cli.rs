//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sphincter",
    version,
    about = "Prepare validated datasets from the sphincter study measurements",
    long_about = "Filter, derive, validate and encode the raw vessel measurements, branch \
                  points and collaterals tables, writing one JSON dataset per variant."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

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
    /// Build and write the prepared datasets.
    Prepare(PrepareArgs),

    /// Reload written datasets, re-validate them and summarize.
    Inspect(InspectArgs),

    /// List the registered variants as configured.
    Variants(VariantsArgs),
}

#[derive(Parser)]
pub struct PrepareArgs {
    /// TOML configuration file (default: ./sphincter.toml when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(long = "measurements", value_name = "PATH")]
    pub measurements: Option<PathBuf>,

    #[arg(long = "branchpoints", value_name = "PATH")]
    pub branchpoints: Option<PathBuf>,

    #[arg(long = "collaterals", value_name = "PATH")]
    pub collaterals: Option<PathBuf>,

    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Build only this variant; repeat for several.
    #[arg(long = "variant", value_name = "NAME")]
    pub variants: Vec<String>,

    /// Raw subject identifier to drop; repeat for several. Replaces the configured list.
    #[arg(long = "exclude-mouse", value_name = "ID")]
    pub exclude_mice: Vec<String>,

    /// Build and validate without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct VariantsArgs {
    /// TOML configuration file (default: ./sphincter.toml when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Raw subject identifier to drop; repeat for several. Replaces the configured list.
    #[arg(long = "exclude-mouse", value_name = "ID")]
    pub exclude_mice: Vec<String>,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Dataset JSON files.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
