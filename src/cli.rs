//! CLI argument parsing for pcpuvis

use crate::config::FlagSettings;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the summary printed to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table (default)
    Text,
    /// JSON report for machine parsing
    Json,
    /// CSV table and time series for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "pcpuvis")]
#[command(version)]
#[command(about = "Parse and visualize per-process CPU usage from perfmon PDH-CSV 4.0 logs", long_about = None)]
pub struct Cli {
    /// Input counter log to process (PDH-CSV 4.0)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Number of CPUs/cores on the monitored system
    #[arg(short = 'c', long = "cores", value_name = "CORES")]
    pub cores: Option<u32>,

    /// Instance suffix is a process ID (after _) instead of an instance number (after #)
    #[arg(short = 'n', long = "numeric-pid")]
    pub numeric_pid: bool,

    /// Show each process instance individually instead of process groups
    #[arg(short = 'd', long = "details")]
    pub details: bool,

    /// Write the CPU usage table to a file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write a stacked chart of the top processes (.png, .svg or an .html report)
    #[arg(short = 'p', long = "picture", value_name = "FILE")]
    pub picture: Option<PathBuf>,

    /// Title shown above the chart
    #[arg(short = 't', long = "title", value_name = "TITLE", default_value = "")]
    pub title: String,

    /// Output format (text, json or csv)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Discard the first data row (perfmon writes a blank first sample)
    #[arg(long = "skip-first-sample")]
    pub skip_first_sample: bool,

    /// Do not draw the progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Show debug information
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Write log output to a file instead of stderr
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Read pipeline settings from a TOML file (flags take precedence)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Pipeline-relevant flags
    pub fn flag_settings(&self) -> FlagSettings {
        FlagSettings {
            cores: self.cores,
            details: self.details,
            numeric_pid: self.numeric_pid,
            skip_first_sample: self.skip_first_sample,
        }
    }

    /// Progress bar is only drawn for text output
    pub fn show_progress(&self) -> bool {
        !self.no_progress && self.format == OutputFormat::Text
    }
}
