//! Repository layer over SQLite.
//!
//! # Responsibility
//! - Define the row-identifier persistence contract for lists and tasks.
//! - Isolate SQL details from the caches and the controller.

pub mod task_store;
