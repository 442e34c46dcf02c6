//! Processing pass that spawns successors for completed recurring tasks.

use crate::task::{
    domain::{SpawnPolicy, SuccessorDraft, Task},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Errors returned by the recurrence processor.
#[derive(Debug, Error)]
pub enum RecurrenceError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for recurrence processing.
pub type RecurrenceResult<T> = Result<T, RecurrenceError>;

/// Spawns successor tasks for completed, actively recurring tasks.
///
/// The processor holds no state of its own; the repository owns the
/// collection and the identifier counter.
#[derive(Clone)]
pub struct RecurrenceProcessor<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    policy: SpawnPolicy,
}

impl<R, C> RecurrenceProcessor<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a processor using [`SpawnPolicy::EveryPass`].
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            policy: SpawnPolicy::default(),
        }
    }

    /// Sets the spawn policy.
    #[must_use]
    pub fn with_policy(mut self, policy: SpawnPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the active spawn policy.
    #[must_use]
    pub const fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    /// Runs one processing pass.
    ///
    /// Every task in the pre-pass snapshot that the policy permits spawns one
    /// successor whose `next_occurrence` is computed from `reference`, or from
    /// the current clock time when `reference` is `None`. Successors created
    /// by this pass are not themselves considered. A task whose next
    /// occurrence cannot be computed is skipped.
    ///
    /// Returns the successors created, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::Repository`] when the store fails; in that
    /// case no successor is appended.
    #[instrument(skip(self), fields(policy = %self.policy))]
    pub fn process(&self, reference: Option<DateTime<Utc>>) -> RecurrenceResult<Vec<Task>> {
        let base = reference.unwrap_or_else(|| self.clock.utc());
        let policy = self.policy;
        let clock = &*self.clock;
        let mut plan = |task: &Task| plan_successor(task, policy, base, clock);

        let spawned = self.repository.append_successors(&mut plan)?;
        for successor in &spawned {
            info!(
                task_id = %successor.id(),
                original_task_id = ?successor.original_task_id(),
                next_occurrence = ?successor.next_occurrence(),
                "spawned recurring task successor"
            );
        }
        debug!(spawned = spawned.len(), reference = %base, "recurrence pass finished");
        Ok(spawned)
    }
}

fn plan_successor(
    task: &Task,
    policy: SpawnPolicy,
    reference: DateTime<Utc>,
    clock: &impl Clock,
) -> Option<SuccessorDraft> {
    if !policy.permits(task) {
        return None;
    }
    match task.next_occurrence_after(reference) {
        Ok(Some(next)) => Some(task.successor_draft(next, clock)),
        Ok(None) => None,
        Err(err) => {
            warn!(task_id = %task.id(), error = %err, "skipping task in recurrence pass");
            None
        }
    }
}
