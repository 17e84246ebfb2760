//! Volatile in-memory stores for the working set and usage statistics.
//!
//! # Responsibility
//! - Hold the authoritative lists/tasks for the running session.
//! - Hold per-day statistics counters.
//!
//! # Invariants
//! - Nothing here touches persistent storage.
//! - Every query returns owned copies; callers never alias cache state.

pub mod data_cache;
pub mod statistics_cache;
