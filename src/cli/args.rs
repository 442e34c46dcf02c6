//! Command-line argument definitions.

use crate::config::CONFIG_PATH_ENV;
use crate::task::domain::SpawnPolicy;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Manage a task list with recurring tasks.
#[derive(Debug, Parser)]
#[command(name = "cadence", version, about)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, global = true, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Override the configured spawn policy (every-pass, once-per-completion).
    #[arg(long, global = true, value_parser = parse_spawn_policy)]
    pub spawn_policy: Option<SpawnPolicy>,

    /// Skip the recurrence pass normally run at startup.
    #[arg(long, global = true)]
    pub no_startup_pass: bool,

    /// When to colour task listings.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// A single shell line, parsed without a binary name.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Add a new task.
    Add(AddArgs),
    /// List tasks, optionally filtered and sorted.
    List(ListArgs),
    /// Search tasks by keyword in title and description.
    Search {
        /// Keyword to look for, ignoring case.
        keyword: String,
    },
    /// Mark a task as complete.
    Complete {
        /// Task identifier.
        id: u64,
    },
    /// Mark a task as incomplete.
    Incomplete {
        /// Task identifier.
        id: u64,
    },
    /// Update a task's title, description, priority, or due date.
    Update(UpdateArgs),
    /// Update a task's priority.
    UpdatePriority {
        /// Task identifier.
        id: u64,
        /// New priority (high, medium, low or h, m, l).
        priority: String,
    },
    /// Add a tag to a task.
    AddTag {
        /// Task identifier.
        id: u64,
        /// Tag to add.
        tag: String,
    },
    /// Remove a tag from a task.
    RemoveTag {
        /// Task identifier.
        id: u64,
        /// Tag to remove.
        tag: String,
    },
    /// Delete a task.
    Delete {
        /// Task identifier.
        id: u64,
    },
    /// Stop a recurring task from spawning successors.
    DisableRecurrence {
        /// Task identifier.
        id: u64,
    },
    /// Resume successor spawning for a recurring task.
    EnableRecurrence {
        /// Task identifier.
        id: u64,
    },
    /// List recurring tasks.
    ListRecurring {
        /// Only tasks whose recurrence is active (true) or inactive (false).
        #[arg(long)]
        active: Option<bool>,
    },
    /// Show when a recurring task would next occur.
    Next {
        /// Task identifier.
        id: u64,
        /// Reference moment (RFC 3339 or YYYY-MM-DD); defaults to now.
        #[arg(long, value_parser = parse_reference)]
        from: Option<DateTime<Utc>>,
    },
    /// Run a recurrence processing pass now.
    Process {
        /// Reference moment (RFC 3339 or YYYY-MM-DD); defaults to now.
        #[arg(long, value_parser = parse_reference)]
        reference: Option<DateTime<Utc>>,
    },
    /// Read commands from standard input, one per line, against one task list.
    Shell,
}

/// Arguments for `add`.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct AddArgs {
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: Option<String>,
    /// Priority (high, medium, low or h, m, l).
    #[arg(long, short)]
    pub priority: Option<String>,
    /// Comma-separated tags.
    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,
    /// Due date in YYYY-MM-DD format.
    #[arg(long)]
    pub due_date: Option<String>,
    /// Recurrence pattern (daily, weekly, monthly).
    #[arg(long)]
    pub recur: Option<String>,
}

/// Arguments for `list`.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ListArgs {
    /// Filter by priority (high, medium, low or h, m, l).
    #[arg(long)]
    pub priority: Option<String>,
    /// Filter by tag.
    #[arg(long)]
    pub tag: Option<String>,
    /// Filter by completion status.
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
    /// Sort order.
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `update`.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct UpdateArgs {
    /// Task identifier.
    pub id: u64,
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New priority.
    #[arg(long, short)]
    pub priority: Option<String>,
    /// New due date in YYYY-MM-DD format; empty clears it.
    #[arg(long)]
    pub due_date: Option<String>,
}

/// Colour mode for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Colour when standard output is a terminal.
    #[default]
    Auto,
    /// Always colour.
    Always,
    /// Never colour.
    Never,
}

impl ColorChoice {
    /// Resolves the choice given whether output goes to a terminal.
    #[must_use]
    pub const fn enabled(self, terminal: bool) -> bool {
        match self {
            Self::Auto => terminal,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Completion status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// Completed tasks.
    Complete,
    /// Tasks not yet completed.
    Incomplete,
}

/// Sort order for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// High priority first.
    Priority,
    /// Earliest due date first.
    DueDate,
    /// Alphabetical by title.
    Title,
    /// Incomplete first.
    Status,
}

fn parse_spawn_policy(value: &str) -> Result<SpawnPolicy, String> {
    SpawnPolicy::try_from(value).map_err(|err| err.to_string())
}

/// Accepts RFC 3339 timestamps and bare dates (midnight UTC).
pub(crate) fn parse_reference(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(moment) = DateTime::parse_from_rfc3339(value) {
        return Ok(moment.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|_| format!("invalid reference '{value}', expected RFC 3339 or YYYY-MM-DD"))
}
