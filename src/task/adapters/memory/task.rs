//! In-memory task repository.
//!
//! The whole collection lives behind one `RwLock`. Every mutation, including
//! the recurrence pass, takes the write guard for its full duration.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{SuccessorDraft, Task, TaskDomainError, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug)]
struct InMemoryTaskState {
    // Identifiers are allocated monotonically, so key order is creation order.
    tasks: BTreeMap<TaskId, Task>,
    next_id: Option<TaskId>,
}

impl Default for InMemoryTaskState {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: Some(TaskId::FIRST),
        }
    }
}

impl InMemoryTaskState {
    fn allocate(&mut self) -> TaskRepositoryResult<TaskId> {
        let id = self.next_id.ok_or(TaskRepositoryError::IdSpaceExhausted)?;
        self.next_id = id.successor();
        Ok(id)
    }

    /// Keeps the counter ahead of identifiers stored from outside the
    /// allocator, such as reconstructed tasks.
    fn reserve_through(&mut self, id: TaskId) {
        if self.next_id.is_some_and(|next| next <= id) {
            self.next_id = id.successor();
        }
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn allocate_id(&self) -> TaskRepositoryResult<TaskId> {
        self.write()?.allocate()
    }

    fn peek_next_id(&self) -> TaskRepositoryResult<TaskId> {
        self.read()?
            .next_id
            .ok_or(TaskRepositoryError::IdSpaceExhausted)
    }

    fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.reserve_through(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .tasks
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    fn modify(
        &self,
        id: TaskId,
        change: &mut dyn FnMut(&mut Task) -> Result<(), TaskDomainError>,
    ) -> TaskRepositoryResult<Result<Task, TaskDomainError>> {
        let mut state = self.write()?;
        let slot = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;

        // Work on a copy so a rejected change leaves the record as it was.
        let mut candidate = slot.clone();
        if let Err(err) = change(&mut candidate) {
            return Ok(Err(err));
        }
        slot.clone_from(&candidate);
        Ok(Ok(candidate))
    }

    fn remove(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        self.write()?
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    fn all(&self) -> TaskRepositoryResult<Vec<Task>> {
        Ok(self.read()?.tasks.values().cloned().collect())
    }

    fn append_successors(
        &self,
        plan: &mut dyn FnMut(&Task) -> Option<SuccessorDraft>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let mut state = self.write()?;

        // Plan against the pre-pass collection before anything is appended.
        let drafts: Vec<SuccessorDraft> = state.tasks.values().filter_map(&mut *plan).collect();

        // Allocate every id up front so an exhausted counter leaves the
        // collection untouched.
        let mut next_id = state.next_id;
        let mut successors = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = next_id.ok_or(TaskRepositoryError::IdSpaceExhausted)?;
            next_id = id.successor();
            successors.push(draft.into_task(id));
        }

        state.next_id = next_id;
        for successor in &successors {
            if let Some(source_id) = successor.original_task_id()
                && let Some(source) = state.tasks.get_mut(&source_id)
            {
                source.record_successor_spawned();
            }
        }
        for successor in &successors {
            state.tasks.insert(successor.id(), successor.clone());
        }
        Ok(successors)
    }
}
