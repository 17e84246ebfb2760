//! Task verification rules applied before the working set is mutated.
//!
//! # Invariants
//! - Verification is pure: it never mutates or logs task content.

use crate::model::task::Task;

/// Pass/fail check for task input.
pub trait TaskVerifier {
    fn verify_task(&self, task: &Task) -> bool;

    /// Passes only when every task passes.
    fn verify_tasks<'a>(&self, tasks: impl IntoIterator<Item = &'a Task>) -> bool
    where
        Self: Sized,
    {
        tasks.into_iter().all(|task| self.verify_task(task))
    }
}

/// Default verifier.
///
/// A task passes when:
/// - `name` contains a non-whitespace character,
/// - `priority` is inside `0..=9`,
/// - `reminder_date` is not later than `due_date` when both are set.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataVerifier;

impl TaskVerifier for DataVerifier {
    fn verify_task(&self, task: &Task) -> bool {
        if task.name.trim().is_empty() {
            return false;
        }
        if !task.priority.is_valid() {
            return false;
        }
        match (task.reminder_date, task.due_date) {
            (Some(reminder), Some(due)) => reminder <= due,
            _ => true,
        }
    }
}
