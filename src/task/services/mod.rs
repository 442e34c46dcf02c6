//! Application services for task management and recurrence processing.

mod lifecycle;
pub mod query;
mod recurrence;

pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
    UpdateTaskRequest,
};
pub use query::{TaskFilter, TaskSortKey};
pub use recurrence::{RecurrenceError, RecurrenceProcessor, RecurrenceResult};
