//! Housekeeper - compress or delete aged files in configured folders.
//!
//! Usage:
//!   housekeeper                          # Use ./HousekeepingFilesFolders.json
//!   housekeeper --config rules.json      # Use another configuration file
//!   housekeeper --log-dir /var/log/hk    # Write housekeeping.log elsewhere
//!   housekeeper --no-log-file -L debug   # Verbose output to stderr only

use std::process::ExitCode;

use clap::Parser;
use housekeeper_cli::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    housekeeper_cli::run(cli)
}
