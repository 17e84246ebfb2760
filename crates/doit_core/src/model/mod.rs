//! Domain model for task lists and usage statistics.
//!
//! # Responsibility
//! - Define the value records shared by cache, controller and storage.
//! - Keep equality content-based so callers can address entities by value.
//!
//! # Invariants
//! - A `Task` is identified by all of its fields, not by a synthetic ID.
//! - A `TaskCollection` name is its natural key inside the working set.

pub mod collection;
pub mod statistics;
pub mod task;
