//! Error types for task domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title cannot be empty")]
    EmptyTitle,

    /// The task title exceeds the character limit.
    #[error("task title cannot exceed {max} characters (got {actual})")]
    TitleTooLong {
        /// Maximum permitted characters.
        max: usize,
        /// Characters supplied.
        actual: usize,
    },

    /// The task description exceeds the character limit.
    #[error("task description cannot exceed {max} characters (got {actual})")]
    DescriptionTooLong {
        /// Maximum permitted characters.
        max: usize,
        /// Characters supplied.
        actual: usize,
    },

    /// The priority value is not one of the supported levels.
    #[error("invalid priority '{0}', expected high, medium, or low")]
    InvalidPriority(String),

    /// The recurrence rule value is unsupported.
    #[error("recurrence rule must be one of: daily, weekly, monthly (got '{0}')")]
    InvalidRecurrenceRule(String),

    /// The due date does not follow `YYYY-MM-DD`.
    #[error("invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),

    /// The task identifier is not a positive integer.
    #[error("invalid task identifier {0}, expected a positive integer")]
    InvalidTaskId(u64),

    /// The tag is empty after trimming.
    #[error("tag must not be empty")]
    EmptyTag,

    /// The operation requires a recurrence rule the task does not have.
    #[error("task {0} is not a recurring task")]
    RecurrenceNotConfigured(TaskId),

    /// Calendar arithmetic left the representable date range.
    #[error("next occurrence for task {0} is outside the supported date range")]
    OccurrenceOutOfRange(TaskId),
}

/// Error returned while parsing persisted or user-supplied enumerations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown spawn policy: {0}")]
pub struct ParseSpawnPolicyError(pub String);
