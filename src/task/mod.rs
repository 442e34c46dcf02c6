//! Task management with recurring-task successor generation.
//!
//! Tasks may carry a recurrence rule (daily, weekly, monthly). When a
//! recurring task with active recurrence is completed, the recurrence
//! processor spawns a fresh successor instance carrying the computed next
//! occurrence. The module follows hexagonal architecture:
//!
//! - Domain types and the pure recurrence engine in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
