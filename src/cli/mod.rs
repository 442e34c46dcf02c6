//! Command-line front end.
//!
//! Every invocation starts with an empty in-memory task list; the startup
//! recurrence pass runs first (unless disabled), then the requested command.
//! Use `shell` to issue several commands against the same list.

mod app;
mod args;
mod render;
mod shell;

pub use app::{App, CliError, CliResult};
pub use args::{
    AddArgs, Cli, ColorChoice, Command, ListArgs, ShellLine, SortArg, StatusArg, UpdateArgs,
};
pub use render::TaskStyle;
pub use shell::{run_shell, split_words};

use crate::config::AppConfig;
use crate::task::adapters::memory::InMemoryTaskRepository;
use mockable::DefaultClock;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::info;

/// Runs a parsed invocation with an already loaded configuration, rendering
/// task lines with `style`.
///
/// # Errors
///
/// Returns [`CliError`] when the startup pass, the command, or I/O fails.
pub fn run(
    cli: &Cli,
    config: &AppConfig,
    style: TaskStyle,
    input: impl BufRead,
    out: &mut impl Write,
) -> CliResult<()> {
    let app = App::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(DefaultClock),
        &config.recurrence,
        cli.spawn_policy,
    )
    .with_style(style);

    if config.recurrence.process_on_startup && !cli.no_startup_pass {
        let spawned = app.startup_pass()?;
        info!(spawned = spawned.len(), "startup recurrence pass complete");
    }

    match &cli.command {
        Command::Shell => run_shell(&app, input, out),
        command => app.execute(command, out),
    }
}
