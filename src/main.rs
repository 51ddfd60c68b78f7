//! CLI entry point for apk-finder.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};

mod app;
mod cli;
mod commands;

use app::terminal;
use cli::Cli;

/// Process exit signal calling scripts branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// A locator, version list or version code was printed.
    Success,
    /// The payload was readable but held nothing matching the request.
    NoMatch,
    /// No variant table was present, or stdin was empty.
    NoTable,
    /// Bad usage, bad encoding, oversized payload or an invalid selector.
    Failure,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::NoMatch => 1,
            Self::NoTable => 2,
            Self::Failure => 3,
        }
    }
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        ExitCode::from(exit.code())
    }
}

fn main() -> ExitCode {
    // Parse before tracing so --help works without logs. Clap's own usage code
    // (2) collides with "no table", so usage errors are reported as failures.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ProcessExit::Failure.into()
            } else {
                ProcessExit::Success.into()
            };
        }
    };

    let default_level = terminal::default_log_level(cli.quiet, cli.verbose);
    let no_color = terminal::no_color_env_requested() || terminal::is_dumb_terminal();
    terminal::init_tracing(default_level, no_color);
    debug!(?cli, "CLI arguments parsed");

    let stdin = io::stdin();
    let stdout = io::stdout();
    match commands::run(&cli.command, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(exit) => {
            debug!(code = exit.code(), "Command finished");
            exit.into()
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e:#}");
            ProcessExit::Failure.into()
        }
    }
}
