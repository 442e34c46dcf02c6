//! Repository port for task storage, identifier allocation, and the batched
//! successor append used by the recurrence processor.

use crate::task::domain::{SuccessorDraft, Task, TaskDomainError, TaskId};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task storage contract.
///
/// The repository owns the task collection and is the single writer of new
/// identifiers.
pub trait TaskRepository: Send + Sync {
    /// Reserves the next unique task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::IdSpaceExhausted`] when no identifier
    /// remains.
    fn allocate_id(&self) -> TaskRepositoryResult<TaskId>;

    /// Returns the identifier the next allocation will hand out, without
    /// reserving it.
    fn peek_next_id(&self) -> TaskRepositoryResult<TaskId>;

    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Replaces an existing task record wholesale.
    ///
    /// Prefer [`TaskRepository::modify`] for read-modify-write changes; a
    /// record loaded earlier may be stale by the time it is written back.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Applies `change` to the stored task under the same exclusive access
    /// as [`TaskRepository::append_successors`], and returns the result.
    ///
    /// The outer result reports store failures. The inner result carries a
    /// rejection from `change`, in which case the stored task is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    fn modify(
        &self,
        id: TaskId,
        change: &mut dyn FnMut(&mut Task) -> Result<(), TaskDomainError>,
    ) -> TaskRepositoryResult<Result<Task, TaskDomainError>>;

    /// Removes a task and returns it.
    ///
    /// Successors referencing the removed task are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    fn remove(&self, id: TaskId) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task in creation order.
    fn all(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Runs one successor-spawning pass as a single atomic batch.
    ///
    /// `plan` is consulted once per task in a snapshot taken before any
    /// successor is appended, so successors created by this call are never
    /// planned from. For every draft returned, the repository allocates a
    /// fresh identifier, appends the successor and records the spawn on the
    /// source task. Readers observe either none or all of the batch.
    ///
    /// Returns the successors in snapshot order.
    fn append_successors(
        &self,
        plan: &mut dyn FnMut(&Task) -> Option<SuccessorDraft>,
    ) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The identifier counter cannot advance any further.
    #[error("task identifier space exhausted")]
    IdSpaceExhausted,

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
