//! Step definitions for recurring task behaviour scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
