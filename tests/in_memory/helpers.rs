//! Shared test helpers for in-memory repository integration tests.

use cadence::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{
        NewTask, PersistedTaskData, Priority, RecurrenceRule, Task, TaskDescription, TaskId,
        TaskOrigin, TaskTitle,
    },
    ports::TaskRepository,
};
use chrono::{TimeZone, Utc};
use mockable::DefaultClock;
use rstest::fixture;

/// Provides a fresh in-memory repository for each test.
#[fixture]
pub fn repo() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

/// Provides a clock for task creation.
#[fixture]
pub fn clock() -> DefaultClock {
    DefaultClock
}

/// Allocates an id and stores a new task, returning it.
///
/// # Errors
///
/// Returns an error if the title is invalid or the repository rejects the
/// task.
pub fn store_task(
    repo: &InMemoryTaskRepository,
    clock: &DefaultClock,
    title: &str,
    rule: Option<RecurrenceRule>,
) -> Result<Task, eyre::Report> {
    let fields = NewTask {
        recurrence_rule: rule,
        ..NewTask::titled(TaskTitle::new(title)?)
    };
    let task = Task::new(repo.allocate_id()?, fields, clock);
    repo.store(&task)?;
    Ok(task)
}

/// Stores a new task and marks it complete.
///
/// # Errors
///
/// Returns an error if storing or updating the task fails.
pub fn store_completed(
    repo: &InMemoryTaskRepository,
    clock: &DefaultClock,
    title: &str,
    rule: Option<RecurrenceRule>,
) -> Result<Task, eyre::Report> {
    let mut task = store_task(repo, clock, title, rule)?;
    task.mark_complete(clock);
    repo.update(&task)?;
    Ok(task)
}

/// Builds a completed daily task as if reloaded from storage.
///
/// # Errors
///
/// Returns an error if the identifier or title is invalid.
pub fn persisted_daily(id: u64, title: &str) -> Result<Task, eyre::Report> {
    let created_at = Utc
        .with_ymd_and_hms(2025, 1, 1, 6, 0, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("invalid fixture timestamp"))?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id)?,
        title: TaskTitle::new(title)?,
        description: TaskDescription::default(),
        completed: true,
        priority: Priority::Medium,
        tags: Vec::new(),
        due_date: None,
        recurrence_rule: Some(RecurrenceRule::Daily),
        recurrence_active: true,
        origin: TaskOrigin::User,
        next_occurrence: None,
        successor_spawned: false,
        created_at,
        updated_at: created_at,
    }))
}

/// Returns the ids of every stored task in creation order.
///
/// # Errors
///
/// Returns an error if listing fails.
pub fn stored_ids(repo: &InMemoryTaskRepository) -> Result<Vec<u64>, eyre::Report> {
    Ok(repo.all()?.iter().map(|task| task.id().value()).collect())
}
