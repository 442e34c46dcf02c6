//! Shared world state for recurring task BDD scenarios.

use std::sync::Arc;

use cadence::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{SpawnPolicy, Task},
    services::{RecurrenceProcessor, TaskLifecycleService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Processor type used by the BDD world.
pub type TestProcessor = RecurrenceProcessor<InMemoryTaskRepository, DefaultClock>;

/// Scenario world for recurring task behaviour tests.
pub struct RecurringWorld {
    pub repository: Arc<InMemoryTaskRepository>,
    pub clock: Arc<DefaultClock>,
    pub service: TestTaskService,
    pub policy: SpawnPolicy,
    pub current_task: Option<Task>,
    pub last_spawned: Vec<Task>,
}

impl RecurringWorld {
    /// Creates a world with an empty task store.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let clock = Arc::new(DefaultClock);
        let service = TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock));

        Self {
            repository,
            clock,
            service,
            policy: SpawnPolicy::default(),
            current_task: None,
            last_spawned: Vec::new(),
        }
    }

    /// Builds a processor over the world's store with the current policy.
    #[must_use]
    pub fn processor(&self) -> TestProcessor {
        RecurrenceProcessor::new(Arc::clone(&self.repository), Arc::clone(&self.clock))
            .with_policy(self.policy)
    }

    /// Returns the task created by the most recent given step.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has been created yet.
    pub fn current_task(&self) -> Result<&Task, eyre::Report> {
        self.current_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing created task in scenario world"))
    }
}

impl Default for RecurringWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RecurringWorld {
    RecurringWorld::default()
}
