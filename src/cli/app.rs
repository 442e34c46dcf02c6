//! Command execution against one task store.

use super::args::{AddArgs, Command, ListArgs, SortArg, StatusArg, UpdateArgs};
use super::render::TaskStyle;
use crate::config::RecurrenceConfig;
use crate::task::{
    domain::{Priority, SpawnPolicy, Task, TaskDomainError, TaskId},
    ports::TaskRepository,
    services::{
        CreateTaskRequest, RecurrenceError, RecurrenceProcessor, TaskFilter, TaskLifecycleError,
        TaskLifecycleService, TaskSortKey, UpdateTaskRequest,
    },
};
use mockable::Clock;
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced while executing a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// A task operation failed.
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),
    /// The recurrence pass failed.
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
    /// Writing output failed.
    #[error("output error: {0}")]
    Io(#[from] io::Error),
    /// JSON rendering failed.
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The command is not valid in this context.
    #[error("{0}")]
    Usage(String),
}

/// Result type for command execution.
pub type CliResult<T> = Result<T, CliError>;

/// Task services wired to one repository and clock.
pub struct App<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    tasks: TaskLifecycleService<R, C>,
    recurrence: RecurrenceProcessor<R, C>,
    style: TaskStyle,
}

impl<R, C> App<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Wires the services. `policy_override` wins over the configured policy.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        clock: Arc<C>,
        config: &RecurrenceConfig,
        policy_override: Option<SpawnPolicy>,
    ) -> Self {
        let tasks = TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock))
            .with_default_priority(config.default_priority);
        let recurrence = RecurrenceProcessor::new(repository, clock)
            .with_policy(policy_override.unwrap_or(config.spawn_policy));
        Self {
            tasks,
            recurrence,
            style: TaskStyle::PLAIN,
        }
    }

    /// Sets how task lines are rendered.
    #[must_use]
    pub const fn with_style(mut self, style: TaskStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns the task lifecycle service.
    #[must_use]
    pub const fn tasks(&self) -> &TaskLifecycleService<R, C> {
        &self.tasks
    }

    /// Returns the recurrence processor.
    #[must_use]
    pub const fn recurrence(&self) -> &RecurrenceProcessor<R, C> {
        &self.recurrence
    }

    /// Runs the startup recurrence pass.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Recurrence`] when the pass fails.
    pub fn startup_pass(&self) -> CliResult<Vec<Task>> {
        Ok(self.recurrence.process(None)?)
    }

    /// Executes one command, writing human-readable output to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError`] when validation, the task store, or output
    /// fails. [`Command::Shell`] is rejected here; see
    /// [`super::shell::run_shell`].
    pub fn execute(&self, command: &Command, out: &mut impl Write) -> CliResult<()> {
        match command {
            Command::Add(args) => self.add(args, out),
            Command::List(args) => self.list(args, out),
            Command::Search { keyword } => {
                let found = self.tasks.search(keyword)?;
                if found.is_empty() {
                    writeln!(out, "No tasks found containing '{keyword}'.")?;
                    return Ok(());
                }
                self.write_task_list(out, &format!("Search results for '{keyword}'"), &found)
            }
            Command::Complete { id } => {
                let task = self.tasks.mark_complete(task_id(*id)?)?;
                writeln!(out, "Task {} marked as complete.", task.id())?;
                Ok(())
            }
            Command::Incomplete { id } => {
                let task = self.tasks.mark_incomplete(task_id(*id)?)?;
                writeln!(out, "Task {} marked as incomplete.", task.id())?;
                Ok(())
            }
            Command::Update(args) => self.update(args, out),
            Command::UpdatePriority { id, priority } => {
                let task = self.tasks.update_priority(task_id(*id)?, priority)?;
                writeln!(
                    out,
                    "Priority for task {} set to {}.",
                    task.id(),
                    task.priority()
                )?;
                Ok(())
            }
            Command::AddTag { id, tag } => {
                let task = self.tasks.add_tag(task_id(*id)?, tag)?;
                writeln!(out, "Tag '{}' added to task {}.", tag.trim(), task.id())?;
                Ok(())
            }
            Command::RemoveTag { id, tag } => {
                let task = self.tasks.remove_tag(task_id(*id)?, tag)?;
                writeln!(out, "Tag '{}' removed from task {}.", tag.trim(), task.id())?;
                Ok(())
            }
            Command::Delete { id } => {
                let task = self.tasks.delete(task_id(*id)?)?;
                writeln!(out, "Task {} deleted.", task.id())?;
                Ok(())
            }
            Command::DisableRecurrence { id } => {
                let task = self.tasks.disable_recurrence(task_id(*id)?)?;
                writeln!(out, "Recurrence disabled for task {}.", task.id())?;
                Ok(())
            }
            Command::EnableRecurrence { id } => {
                let task = self.tasks.enable_recurrence(task_id(*id)?)?;
                writeln!(out, "Recurrence enabled for task {}.", task.id())?;
                Ok(())
            }
            Command::ListRecurring { active } => self.list_recurring(*active, out),
            Command::Next { id, from } => {
                let target = task_id(*id)?;
                match self.tasks.compute_next_occurrence(target, *from)? {
                    Some(next) => {
                        writeln!(out, "Task {target} next occurs at {}.", next.to_rfc3339())?;
                    }
                    None => writeln!(out, "Task {target} is not a recurring task.")?,
                }
                Ok(())
            }
            Command::Process { reference } => {
                let spawned = self.recurrence.process(*reference)?;
                writeln!(out, "Created {} recurring task instance(s).", spawned.len())?;
                for task in &spawned {
                    writeln!(out, "  {}", self.style.line(task))?;
                }
                Ok(())
            }
            Command::Shell => Err(CliError::Usage(
                "the shell command cannot be nested".to_owned(),
            )),
        }
    }

    fn add(&self, args: &AddArgs, out: &mut impl Write) -> CliResult<()> {
        let mut request = CreateTaskRequest::new(args.title.clone()).with_tags(args.tags.clone());
        if let Some(description) = &args.description {
            request = request.with_description(description.clone());
        }
        if let Some(priority) = &args.priority {
            request = request.with_priority(priority.clone());
        }
        if let Some(due_date) = &args.due_date {
            request = request.with_due_date(due_date.clone());
        }
        if let Some(rule) = &args.recur {
            request = request.with_recurrence(rule.clone());
        }

        let task = self.tasks.create(request)?;
        writeln!(out, "Task added: {}", self.style.line(&task))?;
        Ok(())
    }

    fn update(&self, args: &UpdateArgs, out: &mut impl Write) -> CliResult<()> {
        let mut request = UpdateTaskRequest::new();
        if let Some(title) = &args.title {
            request = request.with_title(title.clone());
        }
        if let Some(description) = &args.description {
            request = request.with_description(description.clone());
        }
        if let Some(priority) = &args.priority {
            request = request.with_priority(priority.clone());
        }
        if let Some(due_date) = &args.due_date {
            request = request.with_due_date(due_date.clone());
        }
        if request.is_empty() {
            return Err(CliError::Usage("nothing to update".to_owned()));
        }

        let task = self.tasks.update(task_id(args.id)?, request)?;
        writeln!(out, "Task {} updated: {}", task.id(), self.style.line(&task))?;
        Ok(())
    }

    fn list(&self, args: &ListArgs, out: &mut impl Write) -> CliResult<()> {
        let filter = TaskFilter {
            completed: args.status.map(|status| status == StatusArg::Complete),
            priority: args
                .priority
                .as_deref()
                .map(Priority::try_from)
                .transpose()?,
            tag: args.tag.clone(),
        };
        let tasks = self.tasks.list(&filter, args.sort.map(sort_key))?;

        if args.json {
            serde_json::to_writer_pretty(&mut *out, &tasks)?;
            writeln!(out)?;
            return Ok(());
        }
        if tasks.is_empty() {
            writeln!(out, "No tasks found.")?;
            return Ok(());
        }
        self.write_task_list(out, "Task list", &tasks)
    }

    fn list_recurring(&self, active: Option<bool>, out: &mut impl Write) -> CliResult<()> {
        let tasks = self.tasks.recurring_tasks(active)?;
        let label = match active {
            Some(true) => "active",
            Some(false) => "inactive",
            None => "all",
        };
        if tasks.is_empty() {
            writeln!(out, "No {label} recurring tasks found.")?;
            return Ok(());
        }
        self.write_task_list(out, &format!("Recurring tasks ({label})"), &tasks)
    }

    fn write_task_list(
        &self,
        out: &mut impl Write,
        heading: &str,
        tasks: &[Task],
    ) -> CliResult<()> {
        let noun = if tasks.len() == 1 { "task" } else { "tasks" };
        writeln!(out, "{heading} ({} {noun}):", tasks.len())?;
        for (position, task) in tasks.iter().enumerate() {
            writeln!(out, "  {}. {}", position + 1, self.style.line(task))?;
        }
        Ok(())
    }
}

const fn sort_key(arg: SortArg) -> TaskSortKey {
    match arg {
        SortArg::Priority => TaskSortKey::Priority,
        SortArg::DueDate => TaskSortKey::DueDate,
        SortArg::Title => TaskSortKey::Title,
        SortArg::Status => TaskSortKey::Status,
    }
}

fn task_id(raw: u64) -> CliResult<TaskId> {
    Ok(TaskId::new(raw)?)
}

