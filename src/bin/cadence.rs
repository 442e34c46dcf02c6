//! Command-line entry point for the cadence task manager.
//!
//! Usage:
//!
//! ```text
//! cadence [--config <path>] [--spawn-policy <policy>] [--color <when>] <command> [args]
//! ```
//!
//! Run `cadence shell` to type commands against one task list, for example:
//!
//! ```text
//! add "Daily Exercise" "Morning workout" --recur daily
//! complete 1
//! process
//! list-recurring --active true
//! ```

use cadence::cli::{self, Cli, ColorChoice, TaskStyle};
use cadence::config::AppConfig;
use cadence::telemetry::init_tracing;
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Cli::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            // Nothing useful remains to do if stderr is gone.
            let _ = writeln!(io::stderr(), "Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> Result<(), String> {
    let config = AppConfig::load(args.config.as_deref()).map_err(|err| err.to_string())?;
    init_tracing(&config.logging).map_err(|err| err.to_string())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let style = TaskStyle::new(args.color.enabled(stdout.is_terminal()));
    if args.color == ColorChoice::Always {
        colored::control::set_override(true);
    }
    let mut out = stdout.lock();
    cli::run(args, &config, style, stdin.lock(), &mut out).map_err(|err| err.to_string())?;
    out.flush().map_err(|err| err.to_string())
}
