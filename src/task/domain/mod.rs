//! Domain model for tasks and their recurrence.
//!
//! The task domain models user-created tasks, the recurrence rules attached
//! to them, and the successor instances spawned when a recurring task is
//! completed. All infrastructure concerns stay outside the domain boundary.

mod error;
mod ids;
mod recurrence;
mod task;

pub use error::{ParseSpawnPolicyError, TaskDomainError};
pub use ids::{DueDate, TaskDescription, TaskId, TaskTitle};
pub use recurrence::{RecurrenceRule, SpawnPolicy};
pub use task::{
    NewTask, PersistedTaskData, Priority, SuccessorDraft, Task, TaskDetails, TaskOrigin,
};
