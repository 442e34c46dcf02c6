//! Service layer for task creation, mutation, and lookup.

use crate::task::{
    domain::{
        DueDate, NewTask, Priority, RecurrenceRule, Task, TaskDescription, TaskDomainError,
        TaskId, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::query::{self, TaskFilter, TaskSortKey};

/// Request payload for creating a task from raw user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    priority: Option<String>,
    tags: Vec<String>,
    due_date: Option<String>,
    recurrence_rule: Option<String>,
    recurrence_active: bool,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: None,
            tags: Vec::new(),
            due_date: None,
            recurrence_rule: None,
            recurrence_active: true,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority (`high`, `medium`, `low` or `h`, `m`, `l`).
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets the due date (`YYYY-MM-DD`).
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Sets the recurrence rule (`daily`, `weekly`, `monthly`).
    #[must_use]
    pub fn with_recurrence(mut self, rule: impl Into<String>) -> Self {
        self.recurrence_rule = Some(rule.into());
        self
    }

    /// Sets whether recurrence starts active. Defaults to `true`.
    #[must_use]
    pub const fn with_recurrence_active(mut self, active: bool) -> Self {
        self.recurrence_active = active;
        self
    }

    fn into_new_task(self, default_priority: Priority) -> Result<NewTask, TaskDomainError> {
        let title = TaskTitle::new(self.title)?;
        let description = self
            .description
            .map(TaskDescription::new)
            .transpose()?
            .unwrap_or_default();
        let priority = self
            .priority
            .as_deref()
            .map(Priority::try_from)
            .transpose()?
            .unwrap_or(default_priority);
        let due_date = parse_due_date(self.due_date.as_deref())?;
        let recurrence_rule = self
            .recurrence_rule
            .as_deref()
            .map(RecurrenceRule::try_from)
            .transpose()?;

        Ok(NewTask {
            tags: self.tags,
            description,
            priority,
            due_date,
            recurrence_rule,
            recurrence_active: self.recurrence_active,
            ..NewTask::titled(title)
        })
    }
}

/// Request payload for updating the editable fields of a task.
///
/// Fields left unset are not changed. An empty due date clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Replaces the due date; an empty string clears it.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Returns `true` when the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    default_priority: Priority,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            default_priority: Priority::default(),
        }
    }

    /// Sets the priority used when a create request names none.
    #[must_use]
    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    /// Creates a new user-origin task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when input validation fails and
    /// [`TaskLifecycleError::Repository`] when the store rejects the task.
    pub fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let fields = request.into_new_task(self.default_priority)?;
        let id = self.repository.allocate_id()?;
        let task = Task::new(id, fields, &*self.clock);
        self.repository.store(&task)?;
        debug!(task_id = %task.id(), recurring = task.is_recurring(), "task created");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub fn find_by_id(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(id)?)
    }

    /// Returns every task in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub fn all(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.all()?)
    }

    /// Applies an update to the editable fields of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when a field fails validation
    /// and [`TaskLifecycleError::Repository`] when the task does not exist.
    pub fn update(&self, id: TaskId, request: UpdateTaskRequest) -> TaskLifecycleResult<Task> {
        let title = request.title.map(TaskTitle::new).transpose()?;
        let description = request.description.map(TaskDescription::new).transpose()?;
        let priority = request
            .priority
            .as_deref()
            .map(Priority::try_from)
            .transpose()?;
        let due_date = request
            .due_date
            .as_deref()
            .map(|raw| parse_due_date(Some(raw)))
            .transpose()?;

        self.modify(id, |task, clock| {
            if let Some(value) = &title {
                task.rename(value.clone(), clock);
            }
            if let Some(value) = &description {
                task.describe(value.clone(), clock);
            }
            if let Some(value) = priority {
                task.set_priority(value, clock);
            }
            if let Some(value) = due_date {
                task.set_due_date(value, clock);
            }
            Ok(())
        })
    }

    /// Replaces the priority of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPriority`] for unknown levels and
    /// [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub fn update_priority(&self, id: TaskId, priority: &str) -> TaskLifecycleResult<Task> {
        let level = Priority::try_from(priority)?;
        self.modify(id, |task, clock| {
            task.set_priority(level, clock);
            Ok(())
        })
    }

    /// Adds a tag to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTag`] for blank tags and
    /// [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub fn add_tag(&self, id: TaskId, tag: &str) -> TaskLifecycleResult<Task> {
        self.modify(id, |task, clock| task.add_tag(tag, clock).map(|_| ()))
    }

    /// Removes a tag from a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub fn remove_tag(&self, id: TaskId, tag: &str) -> TaskLifecycleResult<Task> {
        self.modify(id, |task, clock| {
            task.remove_tag(tag, clock);
            Ok(())
        })
    }

    /// Marks a task as completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub fn mark_complete(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.modify(id, |task, clock| {
            task.mark_complete(clock);
            Ok(())
        })
    }

    /// Marks a task as not completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub fn mark_incomplete(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.modify(id, |task, clock| {
            task.mark_incomplete(clock);
            Ok(())
        })
    }

    /// Deletes a task and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub fn delete(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        let removed = self.repository.remove(id)?;
        debug!(task_id = %id, "task deleted");
        Ok(removed)
    }

    /// Stops a recurring task from spawning further successors.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RecurrenceNotConfigured`] when the task is
    /// not recurring and [`TaskRepositoryError::NotFound`] when it does not
    /// exist.
    pub fn disable_recurrence(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self.modify(id, |task, clock| task.disable_recurrence(clock))?;
        info!(task_id = %id, "recurrence disabled");
        Ok(task)
    }

    /// Re-enables recurrence on a recurring task.
    ///
    /// # Errors
    ///
    /// See [`TaskLifecycleService::disable_recurrence`].
    pub fn enable_recurrence(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self.modify(id, |task, clock| task.enable_recurrence(clock))?;
        info!(task_id = %id, "recurrence enabled");
        Ok(task)
    }

    /// Returns recurring tasks, optionally restricted to active or inactive
    /// recurrence.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub fn recurring_tasks(&self, active: Option<bool>) -> TaskLifecycleResult<Vec<Task>> {
        let tasks = self.repository.all()?;
        Ok(tasks
            .into_iter()
            .filter(Task::is_recurring)
            .filter(|task| active.is_none_or(|wanted| task.recurrence_active() == wanted))
            .collect())
    }

    /// Computes when a task would next recur, relative to `reference` or to
    /// the current clock time when none is given.
    ///
    /// Returns `Ok(None)` for non-recurring tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskDomainError::OccurrenceOutOfRange`] when the step overflows.
    pub fn compute_next_occurrence(
        &self,
        id: TaskId,
        reference: Option<DateTime<Utc>>,
    ) -> TaskLifecycleResult<Option<DateTime<Utc>>> {
        let task = self.load(id)?;
        let base = reference.unwrap_or_else(|| self.clock.utc());
        Ok(task.next_occurrence_after(base)?)
    }

    /// Returns tasks whose title or description contains `keyword`,
    /// ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub fn search(&self, keyword: &str) -> TaskLifecycleResult<Vec<Task>> {
        Ok(query::search(self.repository.all()?, keyword))
    }

    /// Returns tasks matching every criterion of `filter`, optionally sorted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub fn list(
        &self,
        filter: &TaskFilter,
        sort: Option<TaskSortKey>,
    ) -> TaskLifecycleResult<Vec<Task>> {
        let mut tasks = query::filter(self.repository.all()?, filter);
        if let Some(key) = sort {
            query::sort(&mut tasks, key);
        }
        Ok(tasks)
    }

    fn load(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| TaskRepositoryError::NotFound(id).into())
    }

    /// Applies `change` under the store's exclusive access; no stale copy
    /// is ever written back.
    fn modify(
        &self,
        id: TaskId,
        mut change: impl FnMut(&mut Task, &C) -> Result<(), TaskDomainError>,
    ) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        let updated = self
            .repository
            .modify(id, &mut |task: &mut Task| change(task, clock))??;
        Ok(updated)
    }
}

/// Parses an optional due date; blank input means "no due date".
fn parse_due_date(raw: Option<&str>) -> Result<Option<DueDate>, TaskDomainError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => DueDate::parse(value).map(Some),
    }
}
