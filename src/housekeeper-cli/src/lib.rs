//! Command-line front end for the housekeeper.
//!
//! Sets up logging, runs one housekeeping pass and maps the result to a
//! process exit code.

pub mod cli;
pub mod logging;

use std::process::ExitCode;

use housekeeper_core::{Housekeeper, RunOutcome, TracingRunLog};

use crate::cli::Cli;
use crate::logging::{LogSettings, with_logging};

/// Run one housekeeping pass as described by `cli`.
///
/// Exits with failure only when logging cannot be set up or the
/// configuration cannot be loaded. Folder and file errors are logged and do
/// not change the exit code.
pub fn run(cli: Cli) -> ExitCode {
    let settings = LogSettings {
        log_dir: (!cli.no_log_file).then(|| cli.log_dir.clone()),
        level: cli.log_level,
    };

    let outcome = with_logging(&settings, || {
        let log = TracingRunLog;
        Housekeeper::new(&log).run_from_config(&cli.config).outcome
    });

    match outcome {
        Ok(RunOutcome::Aborted) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to set up logging: {e:#}");
            ExitCode::FAILURE
        }
    }
}
