//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "star-rating-studio",
    version,
    about = "Rate a bundle of images from 1 to 5 stars",
    long_about = "Rate the images of a zip bundle on a 1 to 5 star scale, add notes, \
                  and export the results as JSON.\n\n\
                  Progress is saved automatically and survives crashes and restarts \
                  for seven days."
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

    /// Read settings from this file instead of the default location.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a bundle and rate its images interactively.
    Open(OpenArgs),

    /// Show the stored progress.
    Status,

    /// Write results from the stored progress without loading images.
    Export(ExportArgs),

    /// Discard the stored progress.
    Clear,
}

#[derive(Parser)]
pub struct OpenArgs {
    /// Zip archive containing the images.
    #[arg(value_name = "BUNDLE")]
    pub bundle: PathBuf,

    /// Present the images in random order.
    #[arg(long = "shuffle")]
    pub shuffle: bool,

    /// Continue the stored progress for this bundle.
    ///
    /// Without this flag, opening a bundle starts a new session and
    /// discards stored progress.
    #[arg(long = "resume")]
    pub resume: bool,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Directory for the results file (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
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
