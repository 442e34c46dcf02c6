//! Search, filtering, and sorting over task lists.

use crate::task::domain::{Priority, Task};
use std::cmp::Ordering;

/// Criteria for narrowing a task list. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Required completion state.
    pub completed: Option<bool>,
    /// Required priority.
    pub priority: Option<Priority>,
    /// Tag the task must carry.
    pub tag: Option<String>,
}

impl TaskFilter {
    /// Returns whether `task` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.completed.is_none_or(|done| task.is_completed() == done)
            && self.priority.is_none_or(|level| task.priority() == level)
            && self.tag.as_deref().is_none_or(|tag| task.has_tag(tag))
    }
}

/// Sort orders supported for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskSortKey {
    /// High before medium before low.
    Priority,
    /// Earliest due date first; tasks without one last.
    DueDate,
    /// Alphabetical, ignoring case.
    Title,
    /// Incomplete before complete.
    Status,
}

/// Returns tasks whose title or description contains `keyword`, ignoring
/// case.
#[must_use]
pub fn search(tasks: Vec<Task>, keyword: &str) -> Vec<Task> {
    let needle = keyword.to_lowercase();
    tasks
        .into_iter()
        .filter(|task| {
            task.title().as_str().to_lowercase().contains(&needle)
                || task.description().as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Returns the tasks matching `filter`, preserving order.
#[must_use]
pub fn filter(tasks: Vec<Task>, filter: &TaskFilter) -> Vec<Task> {
    tasks.into_iter().filter(|task| filter.matches(task)).collect()
}

/// Sorts tasks in place. The sort is stable, so ties keep creation order.
pub fn sort(tasks: &mut [Task], key: TaskSortKey) {
    match key {
        TaskSortKey::Priority => tasks.sort_by_key(|task| task.priority().rank()),
        TaskSortKey::DueDate => tasks.sort_by(compare_due_dates),
        TaskSortKey::Title => tasks.sort_by_cached_key(|task| task.title().as_str().to_lowercase()),
        TaskSortKey::Status => tasks.sort_by_key(Task::is_completed),
    }
}

fn compare_due_dates(left: &Task, right: &Task) -> Ordering {
    match (left.due_date(), right.due_date()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
