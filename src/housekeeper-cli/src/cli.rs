//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use housekeeper_core::DEFAULT_CONFIG_FILE;

use crate::logging::DEFAULT_LOG_DIR;

/// Log verbosity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors
    Warn,
    /// Show informational messages, warnings, and errors (default)
    #[default]
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Housekeeper - compress or delete aged files in configured folders.
///
/// Performs one pass over every folder listed in the configuration file and
/// exits.
#[derive(Debug, Parser)]
#[command(name = "housekeeper")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "HOUSEKEEPER_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Directory holding housekeeping.log
    #[arg(long = "log-dir", env = "HOUSEKEEPER_LOG_DIR", default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    /// Set log verbosity level (error, warn, info, debug, trace)
    #[arg(long = "log-level", short = 'L', value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log to stderr only
    #[arg(long = "no-log-file")]
    pub no_log_file: bool,
}
