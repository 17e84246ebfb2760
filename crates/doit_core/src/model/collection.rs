//! Task list model.

use crate::model::task::Task;
use serde::{Deserialize, Serialize};

/// Named grouping of tasks.
///
/// Tasks keep insertion order; `push_task` ignores a task that is already
/// present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCollection {
    pub name: String,
    pub tasks: Vec<Task>,
}

impl TaskCollection {
    /// Creates an empty list.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    /// Creates a list from tasks, dropping repeated entries.
    pub fn with_tasks(name: impl Into<String>, tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut collection = Self::new(name);
        for task in tasks {
            collection.push_task(task);
        }
        collection
    }

    /// Appends `task` unless an equal task is already present.
    pub fn push_task(&mut self, task: Task) -> bool {
        if self.contains(&task) {
            return false;
        }
        self.tasks.push(task);
        true
    }

    pub fn contains(&self, task: &Task) -> bool {
        self.tasks.contains(task)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
