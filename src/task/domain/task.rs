//! Task aggregate root and related lifecycle types.

use super::{DueDate, RecurrenceRule, TaskDescription, TaskDomainError, TaskId, TaskTitle};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Needs attention first.
    High,
    /// Default priority.
    #[default]
    Medium,
    /// Can wait.
    Low,
}

impl Priority {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank, lowest first (`High` sorts before `Low`).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = TaskDomainError;

    /// Accepts full names and their single-letter abbreviations.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "high" | "h" => Ok(Self::High),
            "medium" | "m" => Ok(Self::Medium),
            "low" | "l" => Ok(Self::Low),
            _ => Err(TaskDomainError::InvalidPriority(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a task came into existence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskOrigin {
    /// Created explicitly by a user.
    #[default]
    User,
    /// Spawned by the recurrence processor from a completed task.
    Successor {
        /// Task this instance was spawned from. Lookup key only; the
        /// referenced task may since have been deleted.
        original_task_id: TaskId,
    },
}

impl TaskOrigin {
    /// Returns the source task identifier for spawned successors.
    #[must_use]
    pub const fn original_task_id(self) -> Option<TaskId> {
        match self {
            Self::User => None,
            Self::Successor { original_task_id } => Some(original_task_id),
        }
    }
}

/// Validated field set for creating a user-origin task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Task title.
    pub title: TaskTitle,
    /// Task description.
    pub description: TaskDescription,
    /// Task priority.
    pub priority: Priority,
    /// Tags in insertion order, without duplicates.
    pub tags: Vec<String>,
    /// Optional due date.
    pub due_date: Option<DueDate>,
    /// Optional recurrence rule.
    pub recurrence_rule: Option<RecurrenceRule>,
    /// Whether recurrence should continue after completion.
    pub recurrence_active: bool,
}

impl NewTask {
    /// Creates a field set with defaults for everything but the title.
    #[must_use]
    pub fn titled(title: TaskTitle) -> Self {
        Self {
            title,
            description: TaskDescription::default(),
            priority: Priority::default(),
            tags: Vec::new(),
            due_date: None,
            recurrence_rule: None,
            recurrence_active: true,
        }
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: TaskDescription,
    completed: bool,
    priority: Priority,
    tags: Vec<String>,
    due_date: Option<DueDate>,
    recurrence_rule: Option<RecurrenceRule>,
    recurrence_active: bool,
    origin: TaskOrigin,
    next_occurrence: Option<DateTime<Utc>>,
    successor_spawned: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: TaskDescription,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted tags.
    pub tags: Vec<String>,
    /// Persisted due date, if any.
    pub due_date: Option<DueDate>,
    /// Persisted recurrence rule, if any.
    pub recurrence_rule: Option<RecurrenceRule>,
    /// Persisted recurrence activity flag.
    pub recurrence_active: bool,
    /// Persisted origin.
    pub origin: TaskOrigin,
    /// Persisted informational next occurrence.
    pub next_occurrence: Option<DateTime<Utc>>,
    /// Persisted spawn-once marker.
    pub successor_spawned: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Successor fields captured from a source task before an identifier has
/// been allocated.
///
/// The store turns a draft into a [`Task`] once it has reserved an id, so
/// that id allocation and appending happen under the same guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessorDraft {
    original_task_id: TaskId,
    title: TaskTitle,
    description: TaskDescription,
    priority: Priority,
    tags: Vec<String>,
    due_date: Option<DueDate>,
    recurrence_rule: Option<RecurrenceRule>,
    recurrence_active: bool,
    next_occurrence: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl SuccessorDraft {
    /// Returns the identifier of the task the draft was captured from.
    #[must_use]
    pub const fn original_task_id(&self) -> TaskId {
        self.original_task_id
    }

    /// Returns the computed next occurrence.
    #[must_use]
    pub const fn next_occurrence(&self) -> DateTime<Utc> {
        self.next_occurrence
    }

    /// Materializes the successor under the given freshly allocated id.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            completed: false,
            priority: self.priority,
            tags: self.tags,
            due_date: self.due_date,
            recurrence_rule: self.recurrence_rule,
            recurrence_active: self.recurrence_active,
            origin: TaskOrigin::Successor {
                original_task_id: self.original_task_id,
            },
            next_occurrence: Some(self.next_occurrence),
            successor_spawned: false,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

impl Task {
    /// Creates a new user-origin task with a store-allocated identifier.
    #[must_use]
    pub fn new(id: TaskId, fields: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            title: fields.title,
            description: fields.description,
            completed: false,
            priority: fields.priority,
            tags: dedup_tags(fields.tags),
            due_date: fields.due_date,
            recurrence_rule: fields.recurrence_rule,
            recurrence_active: fields.recurrence_active,
            origin: TaskOrigin::User,
            next_occurrence: None,
            successor_spawned: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            completed: data.completed,
            priority: data.priority,
            tags: data.tags,
            due_date: data.due_date,
            recurrence_rule: data.recurrence_rule,
            recurrence_active: data.recurrence_active,
            origin: data.origin,
            next_occurrence: data.next_occurrence,
            successor_spawned: data.successor_spawned,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the task tags in insertion order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns whether the task carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DueDate> {
        self.due_date
    }

    /// Returns the recurrence rule, if any.
    #[must_use]
    pub const fn recurrence_rule(&self) -> Option<RecurrenceRule> {
        self.recurrence_rule
    }

    /// Returns the raw recurrence activity flag.
    ///
    /// Only meaningful when a recurrence rule is set; see
    /// [`Task::is_active_recurring`].
    #[must_use]
    pub const fn recurrence_active(&self) -> bool {
        self.recurrence_active
    }

    /// Returns the task origin.
    #[must_use]
    pub const fn origin(&self) -> TaskOrigin {
        self.origin
    }

    /// Returns the source task id when this task was spawned as a successor.
    #[must_use]
    pub const fn original_task_id(&self) -> Option<TaskId> {
        self.origin.original_task_id()
    }

    /// Returns the informational next occurrence set at spawn time.
    #[must_use]
    pub const fn next_occurrence(&self) -> Option<DateTime<Utc>> {
        self.next_occurrence
    }

    /// Returns whether a successor has been spawned since the task was last
    /// completed.
    #[must_use]
    pub const fn successor_spawned(&self) -> bool {
        self.successor_spawned
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the task as completed.
    ///
    /// An incomplete → complete transition clears the spawn-once marker so
    /// the new completion may spawn its own successor. Completing an already
    /// completed task changes nothing and returns `false`.
    pub fn mark_complete(&mut self, clock: &impl Clock) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.successor_spawned = false;
        self.touch(clock);
        true
    }

    /// Marks the task as not completed. Returns `false` if it already was.
    pub fn mark_incomplete(&mut self, clock: &impl Clock) -> bool {
        if !self.completed {
            return false;
        }
        self.completed = false;
        self.touch(clock);
        true
    }

    /// Replaces the title.
    pub fn rename(&mut self, title: TaskTitle, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the description.
    pub fn describe(&mut self, description: TaskDescription, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Replaces the priority.
    pub fn set_priority(&mut self, priority: Priority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Replaces or clears the due date.
    pub fn set_due_date(&mut self, due_date: Option<DueDate>, clock: &impl Clock) {
        self.due_date = due_date;
        self.touch(clock);
    }

    /// Adds a tag unless already present. Returns whether the tag was added.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTag`] for a blank tag.
    pub fn add_tag(&mut self, tag: &str, clock: &impl Clock) -> Result<bool, TaskDomainError> {
        let normalized = normalize_tag(tag)?;
        if self.has_tag(normalized) {
            return Ok(false);
        }
        self.tags.push(normalized.to_owned());
        self.touch(clock);
        Ok(true)
    }

    /// Removes a tag if present. Returns whether the tag was removed.
    pub fn remove_tag(&mut self, tag: &str, clock: &impl Clock) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag.trim());
        let removed = self.tags.len() != before;
        if removed {
            self.touch(clock);
        }
        removed
    }

    /// Stops this task from spawning further successors.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RecurrenceNotConfigured`] when the task has
    /// no recurrence rule.
    pub fn disable_recurrence(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.set_recurrence_active(false, clock)
    }

    /// Re-enables recurrence after it was disabled.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RecurrenceNotConfigured`] when the task has
    /// no recurrence rule.
    pub fn enable_recurrence(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.set_recurrence_active(true, clock)
    }

    /// Captures the fields a successor inherits from this task.
    #[must_use]
    pub fn successor_draft(
        &self,
        next_occurrence: DateTime<Utc>,
        clock: &impl Clock,
    ) -> SuccessorDraft {
        SuccessorDraft {
            original_task_id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            tags: self.tags.clone(),
            due_date: self.due_date,
            recurrence_rule: self.recurrence_rule,
            recurrence_active: self.recurrence_active,
            next_occurrence,
            created_at: clock.utc(),
        }
    }

    /// Records that the processing pass spawned a successor from this task.
    pub const fn record_successor_spawned(&mut self) {
        self.successor_spawned = true;
    }

    fn set_recurrence_active(
        &mut self,
        active: bool,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.recurrence_rule.is_none() {
            return Err(TaskDomainError::RecurrenceNotConfigured(self.id));
        }
        self.recurrence_active = active;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

impl Task {
    /// Returns the optional trailing segments of the one-line summary:
    /// description, tags, due date, recurrence, next occurrence and origin.
    #[must_use]
    pub const fn details(&self) -> TaskDetails<'_> {
        TaskDetails(self)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.completed { "x" } else { " " };
        write!(
            f,
            "[{status}] {id}: {title} ({priority}){details}",
            id = self.id,
            title = self.title,
            priority = self.priority,
            details = self.details(),
        )
    }
}

/// Trailing summary segments of a [`Task`]; empty when none apply.
#[derive(Debug, Clone, Copy)]
pub struct TaskDetails<'a>(&'a Task);

impl fmt::Display for TaskDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let task = self.0;
        if !task.description.is_empty() {
            write!(f, " - {}", task.description)?;
        }
        if !task.tags.is_empty() {
            write!(f, " [tags: {}]", task.tags.join(", "))?;
        }
        if let Some(due) = task.due_date {
            write!(f, " [due: {due}]")?;
        }
        if let Some(rule) = task.recurrence_rule {
            let state = if task.recurrence_active {
                "active"
            } else {
                "inactive"
            };
            write!(f, " [recurs: {rule}, {state}]")?;
        }
        if let Some(next) = task.next_occurrence {
            write!(f, " [next: {}]", next.format("%Y-%m-%d %H:%M"))?;
        }
        if let Some(source) = task.original_task_id() {
            write!(f, " [from #{source}]")?;
        }
        Ok(())
    }
}

/// Trims a tag and rejects blank values.
fn normalize_tag(tag: &str) -> Result<&str, TaskDomainError> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTag);
    }
    Ok(trimmed)
}

/// Keeps the first occurrence of each non-blank tag.
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let Ok(normalized) = normalize_tag(&tag) else {
            continue;
        };
        if !unique.iter().any(|existing| existing == normalized) {
            unique.push(normalized.to_owned());
        }
    }
    unique
}
