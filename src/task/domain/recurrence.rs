//! Recurrence rules and the pure predicates that drive successor spawning.
//!
//! Calendar arithmetic is done on `chrono` values. Monthly steps clamp the
//! day-of-month to the last valid day of the target month, so a task due on
//! the 31st settles on each month's last day instead of drifting into the
//! following month.

use super::{ParseSpawnPolicyError, Task, TaskDomainError};
use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported recurrence cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceRule {
    /// Every day.
    Daily,
    /// Every seven days.
    Weekly,
    /// Same day-of-month each month, clamped to month end.
    Monthly,
}

impl RecurrenceRule {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Returns the next occurrence after `reference`.
    ///
    /// The time of day is preserved for every rule. Returns `None` only when
    /// the result falls outside the range `chrono` can represent.
    #[must_use]
    pub fn next_after(self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Daily => reference.checked_add_signed(TimeDelta::days(1)),
            Self::Weekly => reference.checked_add_signed(TimeDelta::weeks(1)),
            // `checked_add_months` clamps to the last day of the target month.
            Self::Monthly => reference.checked_add_months(Months::new(1)),
        }
    }
}

impl TryFrom<&str> for RecurrenceRule {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(TaskDomainError::InvalidRecurrenceRule(value.to_owned())),
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy deciding whether an eligible task may spawn again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Every pass spawns from every eligible task, even one that already
    /// spawned a successor for the same completion.
    #[default]
    EveryPass,
    /// A task spawns at most once per completion. The marker is reset when
    /// the task goes from incomplete to complete again.
    OncePerCompletion,
}

impl SpawnPolicy {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EveryPass => "every_pass",
            Self::OncePerCompletion => "once_per_completion",
        }
    }

    /// Returns whether `task` may spawn a successor under this policy.
    #[must_use]
    pub const fn permits(self, task: &Task) -> bool {
        if !task.should_spawn_successor() {
            return false;
        }
        match self {
            Self::EveryPass => true,
            Self::OncePerCompletion => !task.successor_spawned(),
        }
    }
}

impl TryFrom<&str> for SpawnPolicy {
    type Error = ParseSpawnPolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "every_pass" => Ok(Self::EveryPass),
            "once_per_completion" => Ok(Self::OncePerCompletion),
            _ => Err(ParseSpawnPolicyError(value.to_owned())),
        }
    }
}

impl fmt::Display for SpawnPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Task {
    /// Returns `true` when the task has a recurrence rule.
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.recurrence_rule().is_some()
    }

    /// Returns `true` when the task is recurring and recurrence is active.
    #[must_use]
    pub const fn is_active_recurring(&self) -> bool {
        self.is_recurring() && self.recurrence_active()
    }

    /// Eligibility gate for the processing pass: completion triggers a
    /// successor, active recurrence permits it.
    #[must_use]
    pub const fn should_spawn_successor(&self) -> bool {
        self.is_active_recurring() && self.is_completed()
    }

    /// Computes the next occurrence relative to `reference`.
    ///
    /// Returns `Ok(None)` for non-recurring tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::OccurrenceOutOfRange`] when the calendar
    /// step overflows the representable range.
    pub fn next_occurrence_after(
        &self,
        reference: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, TaskDomainError> {
        let Some(rule) = self.recurrence_rule() else {
            return Ok(None);
        };
        rule.next_after(reference)
            .map(Some)
            .ok_or(TaskDomainError::OccurrenceOutOfRange(self.id()))
    }

    /// Computes the next occurrence using the creation timestamp as base.
    ///
    /// # Errors
    ///
    /// See [`Task::next_occurrence_after`].
    pub fn next_occurrence_from_creation(&self) -> Result<Option<DateTime<Utc>>, TaskDomainError> {
        self.next_occurrence_after(self.created_at())
    }
}
