//! Cadence: task management with recurring tasks.
//!
//! This crate manages a task list in which some tasks recur daily, weekly,
//! or monthly. Completing a recurring task makes it eligible for the
//! recurrence processor, which spawns a fresh successor carrying the
//! computed next occurrence.
//!
//! # Architecture
//!
//! Cadence follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`task`]: Task domain, recurrence engine, store, and services
//! - [`config`]: TOML configuration with environment overrides
//! - [`telemetry`]: Tracing subscriber setup
//! - [`cli`]: Command-line front end

pub mod cli;
pub mod config;
pub mod task;
pub mod telemetry;
