//! One-line task rendering, optionally coloured for a terminal.
//!
//! Completed tasks show a green marker and pending ones a yellow marker.
//! Priorities are red (high), yellow (medium) or green (low).

use crate::task::domain::{Priority, Task};
use colored::{ColoredString, Colorize};

/// Renders tasks as one-line summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStyle {
    colored: bool,
}

impl TaskStyle {
    /// Plain output, identical to the task's `Display` form.
    pub const PLAIN: Self = Self { colored: false };

    /// Creates a style; `colored` enables ANSI colours.
    #[must_use]
    pub const fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Renders one task.
    #[must_use]
    pub fn line(self, task: &Task) -> String {
        if !self.colored {
            return task.to_string();
        }
        format!(
            "{status} {id}: {title} ({priority}){details}",
            status = status_marker(task),
            id = task.id(),
            title = task.title().as_str().bold(),
            priority = priority_label(task.priority()),
            details = task.details(),
        )
    }
}

fn status_marker(task: &Task) -> ColoredString {
    if task.is_completed() {
        "[x]".green()
    } else {
        "[ ]".yellow()
    }
}

fn priority_label(priority: Priority) -> ColoredString {
    let label = priority.as_str();
    match priority {
        Priority::High => label.red(),
        Priority::Medium => label.yellow(),
        Priority::Low => label.green(),
    }
}
