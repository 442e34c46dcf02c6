//! Line-oriented shell over one in-memory task list.
//!
//! Each input line is one command in the same syntax as the command line,
//! for example `add "Daily Exercise" --recur daily`. Blank lines and lines
//! starting with `#` are ignored; `exit` or `quit` ends the session.

use super::app::{App, CliError, CliResult};
use super::args::ShellLine;
use crate::task::ports::TaskRepository;
use clap::Parser;
use mockable::Clock;
use std::io::{BufRead, Write};
use tracing::debug;

/// Runs shell commands from `input` until end of input or `exit`.
///
/// Command failures are reported on `out` and the session continues.
///
/// # Errors
///
/// Returns [`CliError::Io`] when reading input or writing output fails.
pub fn run_shell<R, C>(
    app: &App<R, C>,
    input: impl BufRead,
    out: &mut impl Write,
) -> CliResult<()>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    for line in input.lines() {
        let text = line?;
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if matches!(trimmed, "exit" | "quit") {
            break;
        }

        match run_line(app, trimmed, out) {
            Ok(()) => {}
            Err(CliError::Io(err)) => return Err(CliError::Io(err)),
            Err(err) => {
                debug!(error = %err, line = trimmed, "shell command failed");
                writeln!(out, "Error: {err}")?;
            }
        }
    }
    Ok(())
}

fn run_line<R, C>(app: &App<R, C>, line: &str, out: &mut impl Write) -> CliResult<()>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    let words = split_words(line)?;
    match ShellLine::try_parse_from(words) {
        Ok(parsed) => app.execute(&parsed.command, out),
        Err(err) => {
            // Help and usage errors render their own text.
            write!(out, "{}", err.render())?;
            Ok(())
        }
    }
}

/// Splits a line into words, honouring single and double quotes.
///
/// Inside double quotes a backslash escapes the next character; single quotes
/// are literal.
///
/// # Errors
///
/// Returns [`CliError::Usage`] for an unterminated quote or trailing
/// backslash.
pub fn split_words(line: &str) -> CliResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(inner) => current.push(inner),
                        None => return Err(unterminated()),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => current.push(chars.next().ok_or_else(unterminated)?),
                        Some(inner) => current.push(inner),
                        None => return Err(unterminated()),
                    }
                }
            }
            '\\' => {
                in_word = true;
                current.push(chars.next().ok_or_else(unterminated)?);
            }
            ws if ws.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            other => {
                in_word = true;
                current.push(other);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn unterminated() -> CliError {
    CliError::Usage("unterminated quote or escape".to_owned())
}
