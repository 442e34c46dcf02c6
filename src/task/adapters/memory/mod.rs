//! In-memory adapter implementations.
//!
//! The in-memory repository is the task store used by the command-line
//! application and by tests; nothing outlives the process.

mod task;

pub use task::InMemoryTaskRepository;
